use validator::ValidateEmail;

pub fn is_valid(email: &str) -> bool {
    email.validate_email()
}
