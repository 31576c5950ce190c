/// Extract a JSON object from a string that might contain markdown code blocks
pub fn extract_json(s: &str) -> Option<String> {
    // First try: the whole string is valid JSON
    if s.trim().starts_with('{')
        && serde_json::from_str::<serde_json::Value>(s.trim()).is_ok()
    {
        return Some(s.trim().to_string());
    }

    // Second try: extract from markdown code block
    let re = regex::Regex::new(r"```(?:json)?\s*\n?([\s\S]*?)\n?```").ok()?;
    for cap in re.captures_iter(s) {
        let potential_json = cap.get(1)?.as_str().trim();
        if serde_json::from_str::<serde_json::Value>(potential_json).is_ok() {
            return Some(potential_json.to_string());
        }
    }

    // Third try: first balanced brace span
    let brace_start = s.find('{')?;
    let mut depth = 0;
    let mut end = brace_start;

    for (i, c) in s[brace_start..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    end = brace_start + i + 1;
                    break;
                }
            }
            _ => {}
        }
    }

    if depth == 0 && end > brace_start {
        let potential_json = &s[brace_start..end];
        if serde_json::from_str::<serde_json::Value>(potential_json).is_ok() {
            return Some(potential_json.to_string());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_direct() {
        let json = r#"  {"classification": "Good"}  "#;
        assert_eq!(extract_json(json).unwrap(), r#"{"classification": "Good"}"#);
    }

    #[test]
    fn test_extract_markdown_fence() {
        let md = r#"
Here is my assessment:

```json
{"classification": "Bad", "confidence_score": 0.7, "reasoning": "noisy"}
```
"#;
        let extracted = extract_json(md).unwrap();
        assert!(extracted.starts_with('{'));
        assert!(extracted.contains("noisy"));
    }

    #[test]
    fn test_extract_embedded_object() {
        let text = r#"Result: {"a": {"b": 1}} trailing"#;
        assert_eq!(extract_json(text).unwrap(), r#"{"a": {"b": 1}}"#);
    }

    #[test]
    fn test_extract_none() {
        assert!(extract_json("no json here").is_none());
        assert!(extract_json("{ unbalanced").is_none());
    }
}
