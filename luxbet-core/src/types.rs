use serde::{Deserialize, Serialize};
use std::fmt;

/// Whole-rupee amount. The mockup never handles fractional currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Rupees(pub u64);

impl Rupees {
    pub const ZERO: Rupees = Rupees(0);
}

impl fmt::Display for Rupees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        write!(f, "₹{}", grouped)
    }
}

/// Player context supplied by the hosting shell. Read-only to the game core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub username: String,
    pub uid: String,
    pub phone: String,
    pub balance: Rupees,
    pub vip_level: u8,
    pub last_login: String,
}

impl Player {
    /// The mock account every session signs in as.
    pub fn demo() -> Self {
        Self {
            username: "MEMBERNGG1N5P".to_string(),
            uid: "8839210".to_string(),
            phone: "+91 9876543210".to_string(),
            balance: Rupees(300),
            vip_level: 3,
            last_login: "Just now".to_string(),
        }
    }
}
