use bcrypt::BcryptError;

pub fn hash_password(password: &str, cost: u32) -> Result<String, BcryptError> {
    bcrypt::hash(password, cost)
}

pub fn verify_password(password: &str, hashed: &str) -> Result<bool, BcryptError> {
    bcrypt::verify(password, hashed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_only_the_original_password() {
        let hashed = hash_password("Secret123", 4).unwrap();
        assert_ne!(hashed, "Secret123");
        assert!(verify_password("Secret123", &hashed).unwrap());
        assert!(!verify_password("secret123", &hashed).unwrap());
    }
}
