/// Lower-cases the domain part of an e-mail address, leaving the local part
/// untouched. Input without an `@` is returned trimmed.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}
