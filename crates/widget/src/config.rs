use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use warehouse_core::Field;
use warehouse_metadata::{
    CredentialLookup, LabelProvider, ProvenanceSources, SessionLookup, WallClock,
};

use crate::chooser::QueryOrdering;
use crate::notice::{LogNotifier, Notifier};
use crate::query::RecordQuery;

/// Input prompts for the editable fields, as found in the host's tool config.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Placeholders {
    #[serde(rename = "libraryNamePlaceholder")]
    pub library_name: String,
    #[serde(rename = "categoryPlaceholder")]
    pub category: String,
    #[serde(rename = "namePlaceholder")]
    pub name: String,
    #[serde(rename = "unitPriceWithTaxPlaceholder")]
    pub unit_price_with_tax: String,
    #[serde(rename = "quantityPlaceholder")]
    pub quantity: String,
    #[serde(rename = "taxRatePlaceholder")]
    pub tax_rate: String,
    #[serde(rename = "supplierPlaceholder")]
    pub supplier: String,
    #[serde(rename = "skuPlaceholder")]
    pub sku: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            library_name: "Enter library".into(),
            category: "Enter category".into(),
            name: "Enter name".into(),
            unit_price_with_tax: "Enter unit price (tax incl.)".into(),
            quantity: "Enter quantity".into(),
            tax_rate: "Enter tax rate".into(),
            supplier: "Enter supplier".into(),
            sku: "Enter SKU".into(),
        }
    }
}

impl Placeholders {
    /// Prompt for `field`; provenance fields have none.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::LibraryName => &self.library_name,
            Field::Category => &self.category,
            Field::Name => &self.name,
            Field::UnitPriceWithTax => &self.unit_price_with_tax,
            Field::Quantity => &self.quantity,
            Field::TaxRate => &self.tax_rate,
            Field::Supplier => &self.supplier,
            Field::Sku => &self.sku,
            Field::CreatedAt | Field::CreatedBy => "",
        }
    }
}

/// Everything the host injects into a warehouse block.
#[derive(Clone)]
pub struct WidgetConfig {
    pub placeholders: Placeholders,
    pub query: Option<Arc<dyn RecordQuery>>,
    pub provenance: ProvenanceSources,
    pub notifier: Arc<dyn Notifier>,
    pub query_ordering: QueryOrdering,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            placeholders: Placeholders::default(),
            query: None,
            provenance: ProvenanceSources::default(),
            notifier: Arc::new(LogNotifier),
            query_ordering: QueryOrdering::default(),
        }
    }
}

impl fmt::Debug for WidgetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetConfig")
            .field("placeholders", &self.placeholders)
            .field("query", &self.query.is_some())
            .field("provenance", &self.provenance)
            .field("query_ordering", &self.query_ordering)
            .finish_non_exhaustive()
    }
}

impl WidgetConfig {
    /// Read placeholders from the host's JSON tool config. Callbacks are
    /// attached afterwards with the `with_*` builders.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        let placeholders = if value.is_null() {
            Placeholders::default()
        } else {
            Placeholders::deserialize(value)?
        };
        Ok(Self {
            placeholders,
            ..Self::default()
        })
    }

    pub fn with_placeholders(mut self, placeholders: Placeholders) -> Self {
        self.placeholders = placeholders;
        self
    }

    pub fn with_query(mut self, query: Arc<dyn RecordQuery>) -> Self {
        self.query = Some(query);
        self
    }

    pub fn with_now_label(mut self, provider: Arc<dyn LabelProvider>) -> Self {
        self.provenance.now_label = Some(provider);
        self
    }

    pub fn with_user_label(mut self, provider: Arc<dyn LabelProvider>) -> Self {
        self.provenance.user_label = Some(provider);
        self
    }

    pub fn with_session(mut self, session: Arc<dyn SessionLookup>) -> Self {
        self.provenance.session = Some(session);
        self
    }

    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialLookup>) -> Self {
        self.provenance.credentials = Some(credentials);
        self
    }

    pub fn with_wall_clock(mut self, clock: Arc<dyn WallClock>) -> Self {
        self.provenance.wall_clock = clock;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_query_ordering(mut self, ordering: QueryOrdering) -> Self {
        self.query_ordering = ordering;
        self
    }
}
