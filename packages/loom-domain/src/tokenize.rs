/// Splits text into lowercase ASCII word tokens.
///
/// Anything other than an ASCII letter, digit or underscore separates tokens, and tokens of a
/// single character are dropped. Duplicates are kept in order.
pub fn tokenize(text: &str) -> Vec<String> {
	let mut normalized = String::with_capacity(text.len());

	for ch in text.chars() {
		if ch.is_ascii_alphanumeric() || ch == '_' {
			normalized.push(ch.to_ascii_lowercase());
		} else {
			normalized.push(' ');
		}
	}

	normalized.split_whitespace().filter(|token| token.len() > 1).map(str::to_string).collect()
}
