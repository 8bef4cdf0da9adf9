use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::recipes::entities::IngredientAmount;
use crate::models::recipes::requests::RecipeIngredientInput;

pub const USERNAME_MAX_LENGTH: usize = 150;
pub const EMAIL_MAX_LENGTH: usize = 254;
pub const NAME_MAX_LENGTH: usize = 150;
pub const RECIPE_NAME_MAX_LENGTH: usize = 256;

// 字母、数字以及 . @ + - _
static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.@+-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("Invalid email regex")
});

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if username.is_empty() {
        return Err("Username is required");
    }
    if username.chars().count() > USERNAME_MAX_LENGTH {
        return Err("Username must be at most 150 characters");
    }
    if !USERNAME_RE.is_match(username) {
        return Err("Username may contain only letters, digits and @/./+/-/_ characters");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.chars().count() > EMAIL_MAX_LENGTH {
        return Err("Email must be at most 254 characters");
    }
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 域名部分转小写，本地部分保持原样
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// 姓名字段：必填，最多 150 字符
pub fn validate_person_name(value: &str, field: &'static str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} is required"));
    }
    if value.chars().count() > NAME_MAX_LENGTH {
        return Err(format!("{field} must be at most 150 characters"));
    }
    Ok(())
}

/// 密码策略验证结果
#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl PasswordValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// 验证密码是否符合安全策略
///
/// 策略要求：
/// - 最小长度：8 字符
/// - 不能全部是数字
/// - 不能是常见弱密码
/// - 不能与用户名或邮箱过于相似
pub fn validate_password(password: &str, username: &str, email: &str) -> PasswordValidationResult {
    let mut errors = Vec::new();

    if password.chars().count() < 8 {
        errors.push("Password must be at least 8 characters long");
    }

    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        errors.push("Password cannot be entirely numeric");
    }

    let weak_passwords = [
        "password",
        "12345678",
        "123456789",
        "qwerty123",
        "qwertyuiop",
        "admin123",
        "password1",
        "abcd1234",
        "iloveyou",
        "11111111",
    ];
    if weak_passwords
        .iter()
        .any(|&weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    let lowered = password.to_lowercase();
    let email_local = email.split('@').next().unwrap_or_default().to_lowercase();
    if (!username.is_empty() && lowered == username.to_lowercase())
        || (!email_local.is_empty() && lowered == email_local)
    {
        errors.push("Password is too similar to the username or email");
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

pub fn validate_recipe_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Recipe name is required");
    }
    if name.chars().count() > RECIPE_NAME_MAX_LENGTH {
        return Err("Recipe name must be at most 256 characters");
    }
    Ok(())
}

pub fn validate_cooking_time(cooking_time: i64) -> Result<i32, &'static str> {
    if cooking_time < 1 {
        return Err("Cooking time must be at least 1 minute");
    }
    i32::try_from(cooking_time).map_err(|_| "Cooking time is too large")
}

/// 校验菜谱食材列表：非空、id 不重复、用量 >= 1
pub fn validate_recipe_ingredients(
    ingredients: &[RecipeIngredientInput],
) -> Result<Vec<IngredientAmount>, &'static str> {
    if ingredients.is_empty() {
        return Err("At least one ingredient is required");
    }

    let mut seen = HashSet::with_capacity(ingredients.len());
    let mut amounts = Vec::with_capacity(ingredients.len());
    for item in ingredients {
        if !seen.insert(item.id) {
            return Err("Ingredients must be unique");
        }
        if item.amount < 1 {
            return Err("Ingredient amount must be at least 1");
        }
        let amount = i32::try_from(item.amount).map_err(|_| "Ingredient amount is too large")?;
        amounts.push(IngredientAmount {
            ingredient_id: item.id,
            amount,
        });
    }

    Ok(amounts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, amount: i64) -> RecipeIngredientInput {
        RecipeIngredientInput { id, amount }
    }

    #[test]
    fn test_username_rules() {
        assert!(validate_username("chef.anna+1@home").is_ok());
        assert!(validate_username("повар_вася").is_ok());
        assert!(validate_username("bad name").is_err());
        assert!(validate_username("bad#name").is_err());
        assert!(validate_username("").is_err());
        assert!(validate_username(&"a".repeat(151)).is_err());
        assert!(validate_username(&"a".repeat(150)).is_ok());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("cook@example.com").is_ok());
        assert!(validate_email("cook@example").is_err());
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email(" Cook@Example.COM "), "Cook@example.com");
        assert_eq!(normalize_email("no-at-sign"), "no-at-sign");
    }

    #[test]
    fn test_valid_password() {
        assert!(validate_password("SecureP@ss1", "anna", "anna@example.com").is_valid);
        assert!(validate_password("correct horse", "anna", "anna@example.com").is_valid);
    }

    #[test]
    fn test_short_password() {
        let result = validate_password("Ab1", "anna", "anna@example.com");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must be at least 8 characters long")
        );
    }

    #[test]
    fn test_numeric_password() {
        let result = validate_password("9081726354", "anna", "anna@example.com");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password cannot be entirely numeric")
        );
    }

    #[test]
    fn test_common_password() {
        let result = validate_password("Password1", "anna", "anna@example.com");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password is too common, please choose a stronger password")
        );
    }

    #[test]
    fn test_password_similar_to_username() {
        let result = validate_password("Annabelle", "annabelle", "x@example.com");
        assert!(!result.is_valid);
    }

    #[test]
    fn test_recipe_ingredients_rules() {
        assert_eq!(
            validate_recipe_ingredients(&[]),
            Err("At least one ingredient is required")
        );
        assert_eq!(
            validate_recipe_ingredients(&[item(1, 10), item(1, 5)]),
            Err("Ingredients must be unique")
        );
        assert_eq!(
            validate_recipe_ingredients(&[item(1, 0)]),
            Err("Ingredient amount must be at least 1")
        );

        let amounts = validate_recipe_ingredients(&[item(2, 3), item(1, 200)]).expect("valid");
        assert_eq!(amounts.len(), 2);
        assert_eq!(amounts[0].ingredient_id, 2);
        assert_eq!(amounts[1].amount, 200);
    }

    #[test]
    fn test_cooking_time_and_name() {
        assert!(validate_cooking_time(0).is_err());
        assert_eq!(validate_cooking_time(15), Ok(15));
        assert!(validate_recipe_name("").is_err());
        assert!(validate_recipe_name(&"б".repeat(256)).is_ok());
        assert!(validate_recipe_name(&"б".repeat(257)).is_err());
    }
}
