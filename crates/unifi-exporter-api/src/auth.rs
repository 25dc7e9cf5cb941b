/// The platform type of the UniFi controller.
///
/// Determines URL prefixes and login paths for the legacy API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPlatform {
    /// UniFi OS device (UDM, UCG, etc.) -- port 443, `/proxy/network/` prefix.
    UnifiOs,
    /// Standalone Network Application (Java) -- port 8443, no prefix.
    ClassicController,
}

impl ControllerPlatform {
    /// The path prefix for legacy API endpoints.
    pub fn legacy_prefix(self) -> &'static str {
        match self {
            Self::UnifiOs => "/proxy/network",
            Self::ClassicController => "",
        }
    }

    /// The login endpoint path.
    pub fn login_path(self) -> &'static str {
        match self {
            Self::UnifiOs => "/api/auth/login",
            Self::ClassicController => "/api/login",
        }
    }

    /// The logout endpoint path.
    pub fn logout_path(self) -> &'static str {
        match self {
            Self::UnifiOs => "/api/auth/logout",
            Self::ClassicController => "/api/logout",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unifi_os_paths() {
        let p = ControllerPlatform::UnifiOs;
        assert_eq!(p.legacy_prefix(), "/proxy/network");
        assert_eq!(p.login_path(), "/api/auth/login");
        assert_eq!(p.logout_path(), "/api/auth/logout");
    }

    #[test]
    fn classic_paths() {
        let p = ControllerPlatform::ClassicController;
        assert_eq!(p.legacy_prefix(), "");
        assert_eq!(p.login_path(), "/api/login");
    }
}
