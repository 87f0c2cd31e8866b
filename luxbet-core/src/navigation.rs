use crate::error::{LuxbetError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const COUNTRY_CODE: &str = "+91";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    Register,
    Home,
    Game,
}

/// Sign-up form as the register screen collects it.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub phone: String,
    pub verification_code: String,
    pub password: String,
    pub confirm_password: String,
    pub invite_code: Option<String>,
    pub accepted_terms: bool,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<()> {
        let phone = self.phone.trim();
        if phone.is_empty() {
            return Err(LuxbetError::registration("Phone number is required"));
        }

        if !phone.chars().all(|c| c.is_ascii_digit()) || !(7..=15).contains(&phone.len()) {
            return Err(LuxbetError::registration(format!(
                "Invalid phone number: {}",
                phone
            )));
        }

        if self.password.is_empty() {
            return Err(LuxbetError::registration("Password is required"));
        }

        if self.password != self.confirm_password {
            return Err(LuxbetError::registration("Passwords do not match"));
        }

        if !self.accepted_terms {
            return Err(LuxbetError::registration(
                "Privacy agreement must be accepted",
            ));
        }

        Ok(())
    }

    pub fn full_phone(&self) -> String {
        format!("{} {}", COUNTRY_CODE, self.phone.trim())
    }
}

/// Screen routing owned by the hosting shell.
#[derive(Debug)]
pub struct Navigator {
    current: Screen,
    registration_delay: Duration,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Duration::from_millis(1500))
    }
}

impl Navigator {
    pub fn new(registration_delay: Duration) -> Self {
        Self {
            current: Screen::Register,
            registration_delay,
        }
    }

    pub fn current(&self) -> Screen {
        self.current
    }

    /// Mock sign-up: validates the form, waits out the simulated round trip
    /// and lands on the home screen.
    pub async fn register(&mut self, form: &RegistrationForm) -> Result<Screen> {
        self.ensure(Screen::Register, Screen::Home)?;
        form.validate()?;

        tokio::time::sleep(self.registration_delay).await;

        tracing::info!("Registered {}", form.full_phone());
        self.current = Screen::Home;
        Ok(self.current)
    }

    /// Login shortcut for the demo: goes straight home.
    pub fn login(&mut self) -> Result<Screen> {
        self.ensure(Screen::Register, Screen::Home)?;
        self.current = Screen::Home;
        Ok(self.current)
    }

    pub fn enter_game(&mut self) -> Result<Screen> {
        if self.current == Screen::Register {
            return Err(LuxbetError::Navigation {
                from: self.current,
                to: Screen::Game,
            });
        }
        self.current = Screen::Game;
        tracing::debug!("Navigated to game");
        Ok(self.current)
    }

    pub fn return_home(&mut self) -> Result<Screen> {
        if self.current == Screen::Register {
            return Err(LuxbetError::Navigation {
                from: self.current,
                to: Screen::Home,
            });
        }
        self.current = Screen::Home;
        tracing::debug!("Navigated to home");
        Ok(self.current)
    }

    fn ensure(&self, expected: Screen, to: Screen) -> Result<()> {
        if self.current != expected {
            return Err(LuxbetError::Navigation {
                from: self.current,
                to,
            });
        }
        Ok(())
    }
}
