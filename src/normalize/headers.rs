//! Header synthesis for tables the model failed to describe.

/// A keyword-selected header template.
struct Template {
    /// Lower-case keywords; any match in the prompt selects the template.
    keywords: &'static [&'static str],
    base: &'static [&'static str],
    extras: &'static [&'static str],
}

/// Checked in order, first match wins.
const TEMPLATES: &[Template] = &[
    Template {
        keywords: &["user", "management"],
        base: &["User ID", "Name", "Email", "Role", "Department", "Status"],
        extras: &[
            "Username", "Phone", "Location", "Manager", "Last Login", "Created At", "Country",
            "City",
        ],
    },
    Template {
        keywords: &["product"],
        base: &["Product ID", "Name", "Category", "Price", "Stock", "Rating"],
        extras: &[
            "SKU", "Brand", "Color", "Weight", "Dimensions", "Release Date", "Supplier",
            "Warehouse",
        ],
    },
    Template {
        keywords: &["order", "sales"],
        base: &["Order ID", "Customer", "Product", "Quantity", "Price", "Date"],
        extras: &[
            "Status", "Shipping Address", "Payment Method", "Tracking No", "Sales Rep",
            "Discount", "Tax", "Total",
        ],
    },
    Template {
        keywords: &["performance", "downtime", "uptime"],
        base: &[
            "Application", "Hostname", "Method", "Start Time", "Response Time (ms)",
            "Load Time (ms)", "Downtime (min)", "Status",
        ],
        extras: &[
            "Region", "SLA (%)", "Error Rate (%)", "CPU (%)", "Memory (%)", "Disk (%)",
            "Endpoint", "Env",
        ],
    },
];

/// Produce exactly `cols` headers for `prompt`.
///
/// The selected template is truncated to `cols`; any shortfall is filled with
/// `Column N` labels, `N` being the 1-based position.
pub fn fallback_headers(prompt: &str, cols: usize) -> Vec<String> {
    let prompt = prompt.to_lowercase();

    let mut headers: Vec<String> = TEMPLATES
        .iter()
        .find(|template| template.keywords.iter().any(|k| prompt.contains(k)))
        .map(|template| {
            template
                .base
                .iter()
                .chain(template.extras)
                .take(cols)
                .map(|h| h.to_string())
                .collect()
        })
        .unwrap_or_default();

    while headers.len() < cols {
        headers.push(format!("Column {}", headers.len() + 1));
    }
    headers
}
