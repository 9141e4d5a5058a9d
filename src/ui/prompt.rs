//! Interactive password entry.

use anyhow::{Context, Result};
use inquire::{Password, PasswordDisplayMode};
use sweetbox::{Mode, Secret};

/// Password prompts with the command line's length policy.
pub struct Prompt {
    password_min_length: usize,
}

impl Prompt {
    pub fn new(password_min_length: usize) -> Self {
        Self { password_min_length }
    }

    /// Asks for the password of a whole batch.
    ///
    /// Encryption asks twice and enforces the minimum length. Decryption asks
    /// once and accepts anything non-empty, since older containers may have
    /// been made with shorter passwords.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal is unavailable or the user cancels.
    pub fn password(&self, mode: Mode) -> Result<Secret> {
        let password = match mode {
            Mode::Encrypt => Password::new("Enter encryption password:")
                .with_display_mode(PasswordDisplayMode::Masked)
                .with_validator(inquire::min_length!(self.password_min_length, format!("password must be at least {} characters", self.password_min_length)))
                .with_custom_confirmation_message("Confirm password:")
                .with_custom_confirmation_error_message("passwords do not match")
                .prompt(),
            Mode::Decrypt => Password::new("Enter decryption password:")
                .with_display_mode(PasswordDisplayMode::Masked)
                .with_validator(inquire::required!("password cannot be empty"))
                .without_confirmation()
                .prompt(),
        };

        password.map(Secret::from_string).context("password prompt failed")
    }
}
