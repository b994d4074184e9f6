//! Authentication and account registration.

use rusqlite::{params, OptionalExtension};
use tracing::info;

use crate::error::{Error, Result};
use crate::store::Database;

/// Opaque credential check. `Some(display name)` on a match, `None` for an
/// unknown id or wrong secret; the caller decides whether to retry.
pub fn authenticate(db: &Database, usr: i64, secret: &str) -> Result<Option<String>> {
    let row: Option<(String, String)> = db
        .conn()
        .query_row(
            "SELECT pwd, name FROM users WHERE usr = ?1",
            params![usr],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    Ok(match row {
        Some((pwd, name)) if pwd == secret => Some(name),
        _ => None,
    })
}

/// A registration form as captured at the prompt, before validation.
/// `timezone` stays a string here; parsing it is part of validation.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub city: String,
    pub timezone: String,
    pub password: String,
    pub confirm: String,
}

impl Registration {
    /// Pre-creation validation. Returns the parsed timezone offset.
    pub fn validate(&self) -> Result<f64> {
        if !self.email.contains('@') || !self.email.contains('.') {
            return Err(Error::InvalidEmail);
        }
        let timezone: f64 = self
            .timezone
            .trim()
            .parse()
            .map_err(|_| Error::InvalidTimezone)?;
        if self.password != self.confirm {
            return Err(Error::PasswordMismatch);
        }
        Ok(timezone)
    }
}

/// Create a new account with the next free id (`max(usr)+1`) and return
/// the id. Validation runs first; the insert commits immediately.
pub fn register(db: &Database, form: &Registration) -> Result<i64> {
    let timezone = form.validate()?;
    let usr = db.max_id("SELECT MAX(usr) FROM users")? + 1;
    db.conn().execute(
        "INSERT INTO users (usr, pwd, name, email, city, timezone)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![usr, form.password, form.name, form.email, form.city, timezone],
    )?;
    info!(usr, "account registered");
    Ok(usr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed;

    fn form() -> Registration {
        Registration {
            name: "Grace".into(),
            email: "grace@example.com".into(),
            city: "York".into(),
            timezone: "-5".into(),
            password: "s3cret".into(),
            confirm: "s3cret".into(),
        }
    }

    #[test]
    fn test_authenticate() {
        let db = Database::open_in_memory().unwrap();
        seed::insert_sample_data(&db).unwrap();

        assert_eq!(
            authenticate(&db, 12, "password12").unwrap(),
            Some("Sam".to_string())
        );
        assert_eq!(authenticate(&db, 12, "wrong").unwrap(), None);
        assert_eq!(authenticate(&db, 999, "password12").unwrap(), None);
    }

    #[test]
    fn test_validation_rules() {
        let mut bad_email = form();
        bad_email.email = "not-an-email".into();
        assert!(matches!(bad_email.validate(), Err(Error::InvalidEmail)));

        let mut bad_tz = form();
        bad_tz.timezone = "eastern".into();
        assert!(matches!(bad_tz.validate(), Err(Error::InvalidTimezone)));

        let mut mismatch = form();
        mismatch.confirm = "other".into();
        assert!(matches!(mismatch.validate(), Err(Error::PasswordMismatch)));

        assert_eq!(form().validate().unwrap(), -5.0);
    }

    #[test]
    fn test_register_allocates_next_id() {
        let db = Database::open_in_memory().unwrap();
        seed::insert_sample_data(&db).unwrap();

        let usr = register(&db, &form()).unwrap();
        assert_eq!(usr, 15, "sample data tops out at 14");
        assert_eq!(
            authenticate(&db, usr, "s3cret").unwrap(),
            Some("Grace".to_string())
        );

        let next = register(&db, &form()).unwrap();
        assert_eq!(next, 16);
    }

    #[test]
    fn test_register_on_empty_db_starts_at_one() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(register(&db, &form()).unwrap(), 1);
    }
}
