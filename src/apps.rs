/// An app the reviewer can pick, with its Play Store package id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppChoice {
    pub name: &'static str,
    pub id: &'static str,
}

pub const APP_CHOICES: &[AppChoice] = &[
    AppChoice {
        name: "Telkomsel MyTelkomsel",
        id: "com.telkomsel.telkomselcm",
    },
    AppChoice {
        name: "TelkomselKu",
        id: "com.tsel.telkomselku",
    },
    AppChoice {
        name: "DigiposAja",
        id: "com.telkomsel.digiposaja",
    },
    AppChoice {
        name: "IndiHome SMART",
        id: "com.telkomsel.yinni",
    },
    AppChoice {
        name: "Maxstream",
        id: "com.maxstream",
    },
    AppChoice {
        name: "Digi Korlantas(SIM)",
        id: "id.qoin.korlantas.",
    },
    AppChoice {
        name: "Super App Polri(SKCK)",
        id: "idsuperapps.polri.presisi",
    },
    AppChoice {
        name: "Signal Polri(STNK)",
        id: "app.signal.id",
    },
    AppChoice {
        name: "My Pertamina",
        id: "com.dafturn.mypertamina",
    },
];

/// Finds an app by display name (case-insensitive) or exact package id.
pub fn find_app(query: &str) -> Option<&'static AppChoice> {
    let query = query.trim();
    APP_CHOICES
        .iter()
        .find(|app| app.id == query || app.name.eq_ignore_ascii_case(query))
}

pub fn app_names() -> Vec<&'static str> {
    APP_CHOICES.iter().map(|app| app.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_nine_unique_apps() {
        assert_eq!(APP_CHOICES.len(), 9);
        let mut ids: Vec<_> = APP_CHOICES.iter().map(|a| a.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 9);
    }

    #[test]
    fn lookup_by_name_or_id() {
        assert_eq!(find_app("maxstream").unwrap().id, "com.maxstream");
        assert_eq!(
            find_app("com.dafturn.mypertamina").unwrap().name,
            "My Pertamina"
        );
        assert_eq!(find_app("  Signal Polri(STNK) ").unwrap().id, "app.signal.id");
        assert!(find_app("com.example.unknown").is_none());
    }
}
