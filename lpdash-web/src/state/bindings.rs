//! DOM Bindings
//!
//! Looks up the page elements the dashboard writes into. Resolved once at
//! startup; the rest of the app never queries the document again.

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

pub const TOTAL_VALUE_ID: &str = "total-value";
pub const TOTAL_FEES_ID: &str = "total-fees";
pub const ROI_ID: &str = "roi";
pub const TRANSACTIONS_ID: &str = "transaction-tbody";
pub const TOTAL_INVESTMENT_ID: &str = "total-investment";
pub const TOTAL_GAS_ID: &str = "total-gas";
pub const NET_PROFIT_ID: &str = "net-profit";
pub const STATUS_ID: &str = "dashboard-status";

/// Elements that must exist for the dashboard to run
pub const REQUIRED_IDS: [&str; 3] = [TOTAL_VALUE_ID, TOTAL_FEES_ID, ROI_ID];

/// Handles to every element the dashboard renders into
#[derive(Clone)]
pub struct DomBindings {
    pub total_value: HtmlElement,
    pub total_fees: HtmlElement,
    pub roi: HtmlElement,
    pub transactions: Option<HtmlElement>,
    pub total_investment: Option<HtmlElement>,
    pub total_gas: Option<HtmlElement>,
    pub net_profit: Option<HtmlElement>,
    pub status: Option<HtmlElement>,
}

impl DomBindings {
    /// Resolve all bindings. Fails only when a required KPI element is missing.
    pub fn resolve(document: &Document) -> Result<Self, String> {
        let missing: Vec<&str> = REQUIRED_IDS
            .iter()
            .copied()
            .filter(|id| find(document, id).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(format!("missing required elements: #{}", missing.join(", #")));
        }

        let required = |id: &str| find(document, id).ok_or_else(|| format!("missing #{}", id));

        Ok(Self {
            total_value: required(TOTAL_VALUE_ID)?,
            total_fees: required(TOTAL_FEES_ID)?,
            roi: required(ROI_ID)?,
            transactions: find(document, TRANSACTIONS_ID),
            total_investment: find(document, TOTAL_INVESTMENT_ID),
            total_gas: find(document, TOTAL_GAS_ID),
            net_profit: find(document, NET_PROFIT_ID),
            status: find(document, STATUS_ID),
        })
    }

    pub fn has_transaction_table(&self) -> bool {
        self.transactions.is_some()
    }
}

fn find(document: &Document, id: &str) -> Option<HtmlElement> {
    document
        .get_element_by_id(id)
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn document() -> Document {
        web_sys::window().unwrap().document().unwrap()
    }

    fn add(document: &Document, tag: &str, id: &str) {
        let element = document.create_element(tag).unwrap();
        element.set_id(id);
        document.body().unwrap().append_child(&element).unwrap();
    }

    // One test: both cases share the page document
    #[wasm_bindgen_test]
    fn test_resolve() {
        let document = document();

        let err = DomBindings::resolve(&document).err().unwrap();
        assert!(err.contains("#total-value"));

        for id in REQUIRED_IDS {
            add(&document, "span", id);
        }
        let bindings = DomBindings::resolve(&document).unwrap();
        assert!(!bindings.has_transaction_table());
        assert!(bindings.status.is_none());

        add(&document, "tbody", TRANSACTIONS_ID);
        assert!(DomBindings::resolve(&document).unwrap().has_transaction_table());
    }
}
