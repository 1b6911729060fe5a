//! Promotional popup dismissal record.
//!
//! Independent of the cart: a single record with a 30-day expiry marking
//! that the visitor dismissed the newsletter popup, persisted under the
//! `popupCookie` key. When to *display* the popup (scroll position, page
//! load) is UI-layer concern and out of scope here.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{KeyValueStore, POPUP_KEY};

/// How long a dismissal lasts before the popup may show again.
const DISMISSAL_DAYS: i64 = 30;

/// Persisted dismissal record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct DismissalRecord {
    dismissed: bool,
    expires_at: DateTime<Utc>,
}

/// The promotional popup's persisted dismissal state.
#[derive(Clone)]
pub struct PromoPopup {
    store: Arc<dyn KeyValueStore>,
}

impl PromoPopup {
    /// Create a popup over a persistent store.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Whether a live (non-expired) dismissal record exists.
    ///
    /// A missing, malformed, or expired record all read as "not dismissed";
    /// none of these is an error the visitor should see.
    #[must_use]
    pub fn is_dismissed(&self) -> bool {
        self.is_dismissed_at(Utc::now())
    }

    /// Record that the visitor dismissed the popup, valid for 30 days.
    pub fn dismiss(&self) {
        self.dismiss_at(Utc::now());
    }

    // Clock-injected variants so expiry is testable without waiting 30 days.

    fn is_dismissed_at(&self, now: DateTime<Utc>) -> bool {
        let value = match self.store.get(POPUP_KEY) {
            Ok(Some(value)) => value,
            Ok(None) => return false,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read popup record");
                return false;
            }
        };
        match serde_json::from_str::<DismissalRecord>(&value) {
            Ok(record) => record.dismissed && record.expires_at > now,
            Err(e) => {
                tracing::warn!(error = %e, "Popup record is malformed, treating as not dismissed");
                false
            }
        }
    }

    fn dismiss_at(&self, now: DateTime<Utc>) {
        let record = DismissalRecord {
            dismissed: true,
            expires_at: now + Duration::days(DISMISSAL_DAYS),
        };
        let serialized = match serde_json::to_string(&record) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize popup record");
                return;
            }
        };
        if let Err(e) = self.store.put(POPUP_KEY, &serialized) {
            tracing::error!(error = %e, "Failed to persist popup dismissal");
        }
    }
}
