use serde::{Deserialize, Serialize};

/// Whether the viewport follows the plane. Only the user flips this; the
/// animation loop reads it once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CameraMode {
    #[default]
    Locked,
    Free,
}

impl CameraMode {
    pub fn toggled(self) -> Self {
        match self {
            CameraMode::Locked => CameraMode::Free,
            CameraMode::Free => CameraMode::Locked,
        }
    }

    pub fn is_locked(self) -> bool {
        self == CameraMode::Locked
    }

    pub fn from_locked(locked: bool) -> Self {
        if locked {
            CameraMode::Locked
        } else {
            CameraMode::Free
        }
    }

    /// Text for the toggle button.
    pub fn label(self) -> &'static str {
        match self {
            CameraMode::Locked => "CAMERA: LOCKED",
            CameraMode::Free => "CAMERA: FREE",
        }
    }
}

impl std::fmt::Display for CameraMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_locked() {
        assert_eq!(CameraMode::default(), CameraMode::Locked);
    }

    #[test]
    fn test_toggle_round_trip() {
        let mode = CameraMode::Locked.toggled();
        assert_eq!(mode, CameraMode::Free);
        assert_eq!(mode.label(), "CAMERA: FREE");
        assert!(mode.toggled().is_locked());
    }
}
