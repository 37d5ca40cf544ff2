/// URL slug for a hospital name: lower-case, every run of non-alphanumeric
/// characters becomes one hyphen, no leading or trailing hyphen
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("City Hospital"), "city-hospital");
        assert_eq!(slugify("  St. John's  Medical -- Centre! "), "st-john-s-medical-centre");
        assert_eq!(slugify("JIPMER"), "jipmer");
        assert_eq!(slugify("Apollo 24/7"), "apollo-24-7");
        assert_eq!(slugify("---"), "");
        assert_eq!(slugify(""), "");
    }
}
