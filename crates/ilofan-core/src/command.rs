// ── Fan write commands ──
//
// Typed actuator writes and their device text. Validation happens before
// any session is opened; a rejected command never reaches the device.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Speed tier / override input, 0-100.
pub type Percent = u8;

/// A write the device's fan subsystem accepts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum FanCommand {
    /// Pin one fan to a raw duty cycle (0-255).
    Lock { fan: u8, pwm: u8 },
    /// Pin one fan to a percentage.
    Override { fan: u8, percent: Percent },
    /// Pin every fan to the same percentage.
    SetAll { percent: Percent },
    /// Release all manual overrides.
    Unlock,
    /// Set a controller bank's low limit.
    PidLowLimit { pid: u8, value: f64 },
}

/// `round(percent * 2.55)`, so 100% maps to 255. Integer arithmetic keeps
/// half-way values rounding up.
pub fn percent_to_pwm(percent: Percent) -> u8 {
    let scaled = (u16::from(percent.min(100)) * 255 + 50) / 100;
    u8::try_from(scaled).unwrap_or(u8::MAX)
}

impl FanCommand {
    pub fn validate(&self, fan_count: u8) -> Result<(), CoreError> {
        let check_fan = |fan: u8| {
            if fan < fan_count {
                Ok(())
            } else {
                Err(CoreError::ValidationFailed {
                    message: format!("fan index {fan} out of range (device has {fan_count} fans)"),
                })
            }
        };
        let check_percent = |percent: Percent| {
            if percent <= 100 {
                Ok(())
            } else {
                Err(CoreError::ValidationFailed {
                    message: format!("speed {percent}% exceeds 100%"),
                })
            }
        };

        match *self {
            Self::Lock { fan, .. } => check_fan(fan),
            Self::Override { fan, percent } => {
                check_fan(fan)?;
                check_percent(percent)
            }
            Self::SetAll { percent } => check_percent(percent),
            Self::Unlock => Ok(()),
            Self::PidLowLimit { value, .. } => {
                if value.is_finite() && value >= 0.0 {
                    Ok(())
                } else {
                    Err(CoreError::ValidationFailed {
                        message: format!("low limit must be a non-negative number, got {value}"),
                    })
                }
            }
        }
    }

    /// Device command lines, executed in order, one session each.
    pub fn render(&self, fan_count: u8) -> Vec<String> {
        match *self {
            Self::Lock { fan, pwm } => vec![lock_line(fan, pwm)],
            Self::Override { fan, percent } => vec![lock_line(fan, percent_to_pwm(percent))],
            Self::SetAll { percent } => {
                let pwm = percent_to_pwm(percent);
                (0..fan_count).map(|fan| lock_line(fan, pwm)).collect()
            }
            Self::Unlock => vec!["fan p global unlock".to_owned()],
            Self::PidLowLimit { pid, value } => {
                vec![format!("fan pid {pid} lo {:.0}", (value * 100.0).round())]
            }
        }
    }
}

fn lock_line(fan: u8, pwm: u8) -> String {
    format!("fan p {fan} lock {pwm}")
}

/// Raw dump selector for `fan info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum FanInfoKind {
    Fans,
    #[strum(to_string = "controllers", serialize = "pid")]
    Controllers,
    Groups,
}

impl FanInfoKind {
    pub fn command(self) -> &'static str {
        match self {
            Self::Fans => "fan info",
            Self::Controllers => "fan info a",
            Self::Groups => "fan info g",
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn pwm_conversion_rounds() {
        assert_eq!(percent_to_pwm(0), 0);
        assert_eq!(percent_to_pwm(32), 82);
        assert_eq!(percent_to_pwm(60), 153);
        assert_eq!(percent_to_pwm(90), 230);
        assert_eq!(percent_to_pwm(100), 255);
        assert_eq!(percent_to_pwm(200), 255);
    }

    #[test]
    fn renders_single_fan_writes() {
        assert_eq!(
            FanCommand::Lock { fan: 2, pwm: 80 }.render(6),
            vec!["fan p 2 lock 80"]
        );
        assert_eq!(
            FanCommand::Override { fan: 0, percent: 50 }.render(6),
            vec!["fan p 0 lock 128"]
        );
        assert_eq!(FanCommand::Unlock.render(6), vec!["fan p global unlock"]);
    }

    #[test]
    fn set_all_addresses_every_fan() {
        let lines = FanCommand::SetAll { percent: 60 }.render(3);
        assert_eq!(
            lines,
            vec!["fan p 0 lock 153", "fan p 1 lock 153", "fan p 2 lock 153"]
        );
    }

    #[test]
    fn pid_low_limit_is_scaled_by_100() {
        assert_eq!(
            FanCommand::PidLowLimit { pid: 3, value: 25.5 }.render(6),
            vec!["fan pid 3 lo 2550"]
        );
        assert_eq!(
            FanCommand::PidLowLimit { pid: 1, value: 0.123 }.render(6),
            vec!["fan pid 1 lo 12"]
        );
    }

    #[test]
    fn validation_rejects_out_of_range() {
        assert!(FanCommand::Lock { fan: 6, pwm: 1 }.validate(6).is_err());
        assert!(FanCommand::Lock { fan: 5, pwm: 255 }.validate(6).is_ok());
        assert!(FanCommand::Override { fan: 0, percent: 101 }.validate(6).is_err());
        assert!(FanCommand::SetAll { percent: 100 }.validate(6).is_ok());
        assert!(FanCommand::PidLowLimit { pid: 0, value: -1.0 }.validate(6).is_err());
        assert!(FanCommand::PidLowLimit { pid: 0, value: f64::NAN }.validate(6).is_err());
        assert!(FanCommand::Unlock.validate(0).is_ok());
    }

    #[test]
    fn fan_info_commands() {
        assert_eq!(FanInfoKind::Fans.command(), "fan info");
        assert_eq!("pid".parse::<FanInfoKind>().ok(), Some(FanInfoKind::Controllers));
        assert_eq!(FanInfoKind::Groups.command(), "fan info g");
    }
}
