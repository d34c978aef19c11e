//! UI locales and the user-facing error message catalog

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported interface languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Pl,
    En,
    Es,
}

impl Locale {
    pub const ALL: [Self; 3] = [Self::Pl, Self::En, Self::Es];

    /// Language tag sent as `Accept-Language`
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pl => "pl",
            Self::En => "en",
            Self::Es => "es",
        }
    }

    /// Resolve a BCP 47 tag such as `en-GB`, falling back to Polish
    pub fn from_tag_or_default(tag: &str) -> Self {
        tag.parse().unwrap_or_default()
    }

    pub fn messages(self) -> &'static ErrorMessages {
        match self {
            Self::Pl => &PL,
            Self::En => &EN,
            Self::Es => &ES,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLocale(pub String);

impl fmt::Display for UnknownLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported locale: {}", self.0)
    }
}

impl std::error::Error for UnknownLocale {}

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let primary = s
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match primary.as_str() {
            "pl" => Ok(Self::Pl),
            "en" => Ok(Self::En),
            "es" => Ok(Self::Es),
            _ => Err(UnknownLocale(s.to_string())),
        }
    }
}

/// Fixed, display-ready messages for each failure class
#[derive(Debug)]
pub struct ErrorMessages {
    pub network: &'static str,
    pub session_expired: &'static str,
    pub server: &'static str,
    pub service_unavailable: &'static str,
    pub not_found: &'static str,
    pub forbidden: &'static str,
    /// Auth failure whose body is not JSON
    pub unreadable: &'static str,
    generic: &'static str,
}

impl ErrorMessages {
    /// Message for an unmapped HTTP status
    pub fn generic(&self, status: u16) -> String {
        self.generic.replace("{status}", &status.to_string())
    }
}

static PL: ErrorMessages = ErrorMessages {
    network: "Nie udało się połączyć z serwerem. Sprawdź połączenie internetowe.",
    session_expired: "Sesja wygasła. Zaloguj się ponownie.",
    server: "Wystąpił błąd serwera. Spróbuj ponownie później.",
    service_unavailable: "Serwis jest chwilowo niedostępny. Spróbuj ponownie za chwilę.",
    not_found: "Nie znaleziono żądanego zasobu.",
    forbidden: "Brak uprawnień do wykonania tej operacji.",
    unreadable: "Wystąpił błąd",
    generic: "Wystąpił błąd (HTTP {status}).",
};

static EN: ErrorMessages = ErrorMessages {
    network: "Could not connect to the server. Check your internet connection.",
    session_expired: "Your session has expired. Please sign in again.",
    server: "A server error occurred. Please try again later.",
    service_unavailable: "The service is temporarily unavailable. Please try again shortly.",
    not_found: "The requested resource was not found.",
    forbidden: "You do not have permission to perform this action.",
    unreadable: "An error occurred",
    generic: "Something went wrong (HTTP {status}).",
};

static ES: ErrorMessages = ErrorMessages {
    network: "No se pudo conectar con el servidor. Comprueba tu conexión a internet.",
    session_expired: "Tu sesión ha caducado. Inicia sesión de nuevo.",
    server: "Se produjo un error del servidor. Inténtalo de nuevo más tarde.",
    service_unavailable: "El servicio no está disponible temporalmente. Inténtalo de nuevo en un momento.",
    not_found: "No se encontró el recurso solicitado.",
    forbidden: "No tienes permiso para realizar esta acción.",
    unreadable: "Se produjo un error",
    generic: "Se produjo un error (HTTP {status}).",
};
