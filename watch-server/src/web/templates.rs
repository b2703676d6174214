//! Askama templates for the web frontend.

use askama::Template;

use crate::card::CardView;
use crate::config::Language;
use crate::i18n::Catalog;
use crate::irail::Connection;

/// Localized page chrome, resolved once per render.
#[derive(Debug, Clone)]
pub struct Strings {
    pub title: String,
    pub watched_trains: String,
    pub add_train: String,
    pub by_train_number: String,
    pub by_connection: String,
    pub toggle_theme: String,
    pub loading: String,
    pub direct: String,
    pub via: String,
}

impl Strings {
    /// Resolve all page strings for the active language.
    pub fn resolve(catalog: &Catalog, lang: Language) -> Self {
        Self {
            title: catalog.t(lang, "app.title"),
            watched_trains: catalog.t(lang, "page.watchedTrains"),
            add_train: catalog.t(lang, "page.addTrain"),
            by_train_number: catalog.t(lang, "page.byTrainNumber"),
            by_connection: catalog.t(lang, "page.byConnection"),
            toggle_theme: catalog.t(lang, "page.toggleTheme"),
            loading: catalog.t(lang, "card.loading"),
            direct: catalog.t(lang, "modal.direct"),
            via: catalog.t(lang, "modal.via"),
        }
    }
}

/// One card with its registry id, for the index listing.
#[derive(Debug, Clone)]
pub struct CardEntry {
    pub id: u64,
    pub card: CardView,
}

/// Home page: card listing plus the add-train forms.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub lang: &'static str,
    pub theme: &'static str,
    pub strings: Strings,
    pub cards: Vec<CardEntry>,
    pub stations: Vec<String>,
}

/// Connection option view model for templates.
#[derive(Debug, Clone)]
pub struct ConnectionView {
    pub train: String,
    pub from_station: String,
    pub to_station: String,
    pub departure: String,
    pub arrival: String,
    /// One-line summary, e.g. "IC 1832 – 14:05-14:52, direct" or
    /// "IC 1832 – 14:05-15:10, via Mechelen".
    pub summary: String,
}

impl ConnectionView {
    /// Create from a converted connection.
    pub fn from_connection(conn: &Connection, strings: &Strings) -> Self {
        let departure = conn.departure.format("%H:%M").to_string();
        let arrival = conn.arrival.format("%H:%M").to_string();

        let route = if conn.vias.is_empty() {
            strings.direct.clone()
        } else {
            format!("{} {}", strings.via, conn.vias.join(", "))
        };
        let summary = format!("{} – {}-{}, {}", conn.train, departure, arrival, route);

        Self {
            train: conn.train.clone(),
            from_station: conn.from_station.clone(),
            to_station: conn.to_station.clone(),
            departure,
            arrival,
            summary,
        }
    }
}

/// Connection search results page.
#[derive(Template)]
#[template(path = "connection_list.html")]
pub struct ConnectionListTemplate {
    pub lang: &'static str,
    pub theme: &'static str,
    pub strings: Strings,
    pub connections: Vec<ConnectionView>,
    /// Localized message shown instead of results (no match, load error).
    pub message: Option<String>,
}

/// Stop picker page for a looked-up vehicle.
#[derive(Template)]
#[template(path = "vehicle_stops.html")]
pub struct VehicleStopsTemplate {
    pub lang: &'static str,
    pub theme: &'static str,
    pub strings: Strings,
    /// Short train name, e.g. "IC 538".
    pub name: String,
    /// The identifier to pre-fill on the card form.
    pub number: String,
    pub stations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn strings() -> Strings {
        Strings::resolve(&Catalog::builtin(), Language::En)
    }

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn strings_resolve_in_each_language() {
        let catalog = Catalog::builtin();
        assert_eq!(
            Strings::resolve(&catalog, Language::En).direct,
            "direct"
        );
        assert_eq!(
            Strings::resolve(&catalog, Language::Fr).direct,
            "direct"
        );
        assert_eq!(
            Strings::resolve(&catalog, Language::Nl).direct,
            "rechtstreeks"
        );
    }

    #[test]
    fn connection_summary_direct() {
        let conn = Connection {
            train: "IC 1832".to_string(),
            from_station: "Leuven".to_string(),
            to_station: "Ghent-Sint-Pieters".to_string(),
            departure: at(1_700_000_000),
            arrival: at(1_700_002_820),
            vias: vec![],
        };
        let view = ConnectionView::from_connection(&conn, &strings());
        assert_eq!(
            view.summary,
            format!("IC 1832 – {}-{}, direct", view.departure, view.arrival)
        );
    }

    #[test]
    fn connection_summary_with_vias() {
        let conn = Connection {
            train: "IC 1832".to_string(),
            from_station: "Leuven".to_string(),
            to_station: "Bruges".to_string(),
            departure: at(1_700_000_000),
            arrival: at(1_700_005_700),
            vias: vec!["Brussels-South".to_string(), "Ghent-Sint-Pieters".to_string()],
        };
        let view = ConnectionView::from_connection(&conn, &strings());
        assert!(view.summary.contains("via Brussels-South, Ghent-Sint-Pieters"));
    }

    #[test]
    fn connection_view_formats_times() {
        let conn = Connection {
            train: "IC 1832".to_string(),
            from_station: "Leuven".to_string(),
            to_station: "Bruges".to_string(),
            departure: at(1_700_000_000),
            arrival: at(1_700_003_600),
            vias: vec![],
        };
        let view = ConnectionView::from_connection(&conn, &strings());
        assert_eq!(view.departure.len(), 5);
        assert!(view.departure.contains(':'));
    }

    #[test]
    fn index_template_renders() {
        let template = IndexTemplate {
            lang: "en",
            theme: "light",
            strings: strings(),
            cards: vec![],
            stations: vec!["Leuven".to_string()],
        };
        let html = template.render().unwrap();
        assert!(html.contains("Train Watch"));
        assert!(html.contains("data-theme=\"light\""));
        assert!(html.contains("Leuven"));
    }

    #[test]
    fn index_template_renders_card_states() {
        use crate::card::StopRow;

        let ok_card = CardView {
            revision: 2,
            train: "IC 538".to_string(),
            vehicle_name: "IC 538".to_string(),
            station: "Leuven".to_string(),
            error: None,
            loading: false,
            rows: vec![StopRow {
                station: "Aarschot".to_string(),
                arrival: "14:05".to_string(),
                departure: "14:07".to_string(),
                arrival_delay: "+2".to_string(),
                departure_delay: String::new(),
                arrival_canceled: false,
                departure_canceled: false,
                platform: "3".to_string(),
                platform_changed: true,
            }],
            update_label: "just now".to_string(),
            footer_visible: true,
        };
        let error_card = CardView {
            revision: 2,
            train: "IC 999".to_string(),
            vehicle_name: String::new(),
            station: String::new(),
            error: Some("Train not found".to_string()),
            loading: false,
            rows: vec![],
            update_label: String::new(),
            footer_visible: false,
        };

        let template = IndexTemplate {
            lang: "en",
            theme: "light",
            strings: strings(),
            cards: vec![
                CardEntry { id: 1, card: ok_card },
                CardEntry { id: 2, card: error_card },
            ],
            stations: vec![],
        };
        let html = template.render().unwrap();
        assert!(html.contains("Aarschot"));
        assert!(html.contains("+2"));
        assert!(html.contains("just now"));
        assert!(html.contains("Train not found"));
        assert!(html.contains("/cards/1/refresh"));
        assert!(html.contains("/cards/2/delete"));
    }

    #[test]
    fn connection_list_renders_message() {
        let template = ConnectionListTemplate {
            lang: "en",
            theme: "dark",
            strings: strings(),
            connections: vec![],
            message: Some("No connection found".to_string()),
        };
        let html = template.render().unwrap();
        assert!(html.contains("No connection found"));
        assert!(html.contains("data-theme=\"dark\""));
    }

    #[test]
    fn vehicle_stops_renders_stations() {
        let template = VehicleStopsTemplate {
            lang: "en",
            theme: "light",
            strings: strings(),
            name: "IC 538".to_string(),
            number: "IC 538".to_string(),
            stations: vec!["Leuven".to_string(), "Aarschot".to_string()],
        };
        let html = template.render().unwrap();
        assert!(html.contains("IC 538"));
        assert!(html.contains("Aarschot"));
    }
}
