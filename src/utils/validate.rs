use once_cell::sync::Lazy;
use regex::Regex;

const MAX_TITLE_LEN: usize = 200;

// BCP 47 语言标签的常用子集，如 zh、zh-CN、en-US
static LOCALE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z]{2,3}(-[A-Za-z0-9]{2,8})*$").expect("Invalid locale regex")
});

pub fn validate_title(title: &str) -> Result<(), &'static str> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err("Title must not be empty");
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err("Title must be at most 200 characters");
    }
    Ok(())
}

pub fn validate_locale(locale: &str) -> Result<(), &'static str> {
    if !LOCALE_RE.is_match(locale) {
        return Err("Locale must be a language tag such as 'en' or 'zh-CN'");
    }
    Ok(())
}

/// 分数必须是有限数
pub fn validate_finite(value: f64) -> Result<(), &'static str> {
    if !value.is_finite() {
        return Err("Score must be a finite number");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_title() {
        assert!(validate_title("Pitch deck").is_ok());
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"x".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_locale() {
        assert!(validate_locale("en").is_ok());
        assert!(validate_locale("zh-CN").is_ok());
        assert!(validate_locale("pt-BR").is_ok());
        assert!(validate_locale("english!").is_err());
        assert!(validate_locale("").is_err());
    }

    #[test]
    fn test_validate_finite() {
        assert!(validate_finite(7.5).is_ok());
        assert!(validate_finite(f64::NAN).is_err());
        assert!(validate_finite(f64::INFINITY).is_err());
    }
}
