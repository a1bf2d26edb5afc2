// src/session.rs

use crate::{
    error::AppError,
    models::proctor::{Proctor, ProctorPresence},
};

/// Proctor login state.
///
/// `LoggedOut -> WelcomeShown -> Active -> LoggedOut`. Only `Active` grants
/// access to exam selection, attendance scanning and submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    LoggedOut,
    WelcomeShown {
        proctor: Proctor,
        presence: ProctorPresence,
    },
    Active {
        proctor: Proctor,
        presence: ProctorPresence,
    },
}

impl Session {
    pub fn is_logged_out(&self) -> bool {
        matches!(self, Session::LoggedOut)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Session::Active { .. })
    }

    pub fn proctor(&self) -> Option<&Proctor> {
        match self {
            Session::LoggedOut => None,
            Session::WelcomeShown { proctor, .. } | Session::Active { proctor, .. } => Some(proctor),
        }
    }

    pub fn presence(&self) -> Option<&ProctorPresence> {
        match self {
            Session::LoggedOut => None,
            Session::WelcomeShown { presence, .. } | Session::Active { presence, .. } => {
                Some(presence)
            }
        }
    }

    /// A successful badge login.
    pub fn login(&mut self, proctor: Proctor, presence: ProctorPresence) -> Result<(), AppError> {
        if !self.is_logged_out() {
            return Err(AppError::InvalidState("A proctor is already logged in".to_string()));
        }
        *self = Session::WelcomeShown { proctor, presence };
        Ok(())
    }

    /// The proctor dismissed the welcome screen.
    pub fn acknowledge(&mut self) -> Result<(), AppError> {
        match std::mem::take(self) {
            Session::WelcomeShown { proctor, presence } => {
                *self = Session::Active { proctor, presence };
                Ok(())
            }
            other => {
                *self = other;
                Err(AppError::InvalidState("No welcome screen to acknowledge".to_string()))
            }
        }
    }

    /// Replaces the proctor's own presence after a self-scan.
    pub fn update_presence(&mut self, new_presence: ProctorPresence) -> Result<(), AppError> {
        match self {
            Session::LoggedOut => Err(AppError::InvalidState("Not logged in".to_string())),
            Session::WelcomeShown { presence, .. } | Session::Active { presence, .. } => {
                *presence = new_presence;
                Ok(())
            }
        }
    }

    /// Drops proctor and presence. Always succeeds.
    pub fn logout(&mut self) {
        *self = Session::LoggedOut;
    }

    pub fn require_active(&self) -> Result<&Proctor, AppError> {
        match self {
            Session::Active { proctor, .. } => Ok(proctor),
            Session::WelcomeShown { .. } => Err(AppError::InvalidState(
                "Acknowledge the welcome screen first".to_string(),
            )),
            Session::LoggedOut => Err(AppError::InvalidState("Scan your badge to log in".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proctor() -> Proctor {
        Proctor {
            id: "7".to_string(),
            name: "Bu Sari".to_string(),
            niy: "P001".to_string(),
        }
    }

    #[test]
    fn test_full_cycle() {
        let mut session = Session::default();
        assert!(session.require_active().is_err());

        session.login(proctor(), ProctorPresence::default()).unwrap();
        assert!(matches!(session, Session::WelcomeShown { .. }));
        assert!(session.require_active().is_err());

        session.acknowledge().unwrap();
        assert!(session.is_active());
        assert_eq!(session.require_active().unwrap().name, "Bu Sari");

        session.logout();
        assert_eq!(session, Session::LoggedOut);
        assert!(session.proctor().is_none());
    }

    #[test]
    fn test_acknowledge_out_of_order_keeps_state() {
        let mut session = Session::default();
        assert!(session.acknowledge().is_err());
        assert!(session.is_logged_out());

        session.login(proctor(), ProctorPresence::default()).unwrap();
        session.acknowledge().unwrap();
        assert!(session.acknowledge().is_err());
        assert!(session.is_active());
    }

    #[test]
    fn test_second_login_rejected() {
        let mut session = Session::default();
        session.login(proctor(), ProctorPresence::default()).unwrap();
        let err = session.login(proctor(), ProctorPresence::default()).unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[test]
    fn test_update_presence() {
        let mut session = Session::default();
        assert!(session.update_presence(ProctorPresence::default()).is_err());

        session.login(proctor(), ProctorPresence::default()).unwrap();
        session.acknowledge().unwrap();
        session
            .update_presence(ProctorPresence {
                waktu_datang: Some("07:00:00".to_string()),
                waktu_pulang: Some("12:00:00".to_string()),
            })
            .unwrap();
        assert_eq!(
            session.presence().unwrap().waktu_pulang.as_deref(),
            Some("12:00:00")
        );
    }
}
