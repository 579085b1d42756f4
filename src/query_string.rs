use std::collections::HashMap;

#[derive(PartialEq, Debug)]
pub struct QueryString {
    items: HashMap<String, String>,
}

impl QueryString {
    pub fn from(buf: &str) -> Self {
        let vs: Vec<(String, String)> = serde_urlencoded::from_str(buf).unwrap_or_else(|_| vec![]);
        let items: HashMap<String, String> = vs.into_iter().collect();

        QueryString { items }
    }

    pub fn get(&self, key: &str) -> &str {
        self.items.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn get_page(&self) -> u32 {
        let val = self.get("page").parse().unwrap_or(1);
        if val == 0 {
            return 1;
        }
        val
    }

    pub fn get_u32_or(&self, key: &str, default: u32) -> u32 {
        self.get(key).parse().unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_str() {
        let buf = "title=red+sox&confidence=high%2Cmedium&page=3";
        let qs = QueryString::from(buf);
        assert_eq!(qs.get("title"), "red sox");
        assert_eq!(qs.get("confidence"), "high,medium");
        assert_eq!(qs.get_page(), 3);
    }

    #[test]
    fn test_missing_keys_default() {
        let qs = QueryString::from("");
        assert_eq!(qs.get("title"), "");
        assert_eq!(qs.get_page(), 1);
        assert_eq!(qs.get_u32_or("page_size", 50), 50);
    }

    #[test]
    fn test_invalid_page_defaults_to_one() {
        assert_eq!(QueryString::from("page=abc").get_page(), 1);
        assert_eq!(QueryString::from("page=0").get_page(), 1);
    }

    #[test]
    fn test_parse_key_only_query_str() {
        let qs = QueryString::from("key-only");
        assert_eq!(qs.get("key-only"), "");
    }
}
