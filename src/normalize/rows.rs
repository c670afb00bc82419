//! Row synthesis for tables the model failed to fill.
//!
//! Every cell is produced by the first rule whose pattern matches the
//! lower-cased column header. Rule order matters: `username` must be seen
//! before `name`, `payment method` before `method`, `response time (ms)`
//! before the generic `time` rule, and so on.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "John", "Patricia", "Robert", "Jennifer", "Michael", "Linda", "William",
    "Elizabeth", "David", "Barbara", "Richard", "Susan", "Joseph", "Jessica", "Thomas", "Sarah",
    "Priya", "Wei", "Carlos", "Aisha", "Mateo", "Yuki", "Olga", "Kwame",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Wilson", "Anderson", "Taylor", "Thomas", "Moore", "Jackson", "Martin", "Lee",
    "Patel", "Chen", "Nakamura", "Okafor", "Kowalski", "Silva",
];

const ROLES: &[&str] = &["Admin", "Editor", "Viewer", "Manager", "Analyst", "Developer"];
const DEPARTMENTS: &[&str] = &[
    "Engineering", "Sales", "Marketing", "Finance", "Human Resources", "Support", "Operations",
];
const CITIES: &[&str] = &[
    "New York", "London", "Berlin", "Tokyo", "Toronto", "Sydney", "Madrid", "Singapore",
    "Chicago", "Paris",
];
const COUNTRIES: &[&str] = &[
    "United States", "United Kingdom", "Germany", "Japan", "Canada", "Australia", "Spain",
    "Singapore", "France", "India",
];
const REGIONS: &[&str] = &["us-east-1", "us-west-2", "eu-west-1", "eu-central-1", "ap-southeast-1"];
const ENVS: &[&str] = &["production", "staging", "development"];
const APPLICATIONS: &[&str] = &[
    "Checkout Service", "Auth Gateway", "Inventory API", "Billing Portal", "Search Service",
    "Reporting Dashboard",
];
const HTTP_METHODS: &[&str] = &["GET", "POST", "PUT", "PATCH", "DELETE"];
const HOST_ROLES: &[&str] = &["web", "api", "db", "cache", "worker"];
const ENDPOINT_RESOURCES: &[&str] = &["users", "orders", "products", "auth/login", "search", "reports"];
const PRODUCTS: &[&str] = &[
    "Wireless Mouse", "Mechanical Keyboard", "USB-C Hub", "Noise-Cancelling Headphones",
    "27\" Monitor", "Laptop Stand", "Webcam HD", "Portable SSD",
];
const CATEGORIES: &[&str] = &["Electronics", "Accessories", "Office", "Audio", "Storage", "Peripherals"];
const BRANDS: &[&str] = &["Acme", "Globex", "Initech", "Umbrella", "Soylent", "Hooli"];
const COLORS: &[&str] = &["Black", "White", "Silver", "Blue", "Red", "Graphite"];
const SUPPLIERS: &[&str] = &["Northwind Traders", "Contoso Ltd", "Fabrikam Inc", "Tailspin Supply"];
const WAREHOUSES: &[&str] = &["WH-East", "WH-West", "WH-Central", "WH-North"];
const PAYMENT_METHODS: &[&str] = &["Credit Card", "PayPal", "Bank Transfer", "Apple Pay", "Invoice"];
const STREETS: &[&str] = &["Main St", "Oak Ave", "Maple Dr", "Cedar Ln", "Elm St", "Park Blvd"];

/// Per-row synthetic identity so name, username and email agree.
struct Person {
    first: &'static str,
    last: &'static str,
}

impl Person {
    fn draw(rng: &mut dyn RngCore) -> Self {
        Self {
            first: pick(rng, FIRST_NAMES),
            last: pick(rng, LAST_NAMES),
        }
    }

    fn full_name(&self) -> String {
        format!("{} {}", self.first, self.last)
    }

    fn slug(&self) -> String {
        format!("{}.{}", self.first, self.last).to_lowercase()
    }
}

/// What a synthesizer knows about the cell it fills.
struct Cell<'a> {
    /// Lower-cased header.
    header: &'a str,
    /// 0-based row index.
    row: usize,
    person: &'a Person,
}

type Synth = fn(&Cell<'_>, &mut dyn RngCore) -> String;

enum Pattern {
    /// Header contains any of the fragments.
    Any(&'static [&'static str]),
    /// Header equals the string exactly.
    Exact(&'static str),
    /// `id`, `... id` or `..._id`.
    IdField,
}

impl Pattern {
    fn matches(&self, header: &str) -> bool {
        match self {
            Pattern::Any(fragments) => fragments.iter().any(|f| header.contains(f)),
            Pattern::Exact(text) => header == *text,
            Pattern::IdField => header == "id" || header.ends_with(" id") || header.ends_with("_id"),
        }
    }
}

struct Rule {
    pattern: Pattern,
    synth: Synth,
}

const fn rule(pattern: Pattern, synth: Synth) -> Rule {
    Rule { pattern, synth }
}

const RULES: &[Rule] = &[
    rule(Pattern::Any(&["username", "user name", "login name"]), username),
    rule(Pattern::Any(&["email", "e-mail"]), email),
    rule(Pattern::IdField, sequential_id),
    rule(Pattern::Any(&["sku"]), sku),
    rule(Pattern::Any(&["tracking"]), tracking_number),
    rule(Pattern::Any(&["hostname", "host"]), hostname),
    rule(Pattern::Any(&["endpoint", "url", "path"]), endpoint),
    rule(Pattern::Any(&["phone", "mobile"]), phone),
    rule(Pattern::Any(&["address"]), street_address),
    rule(Pattern::Any(&["payment"]), |_, rng| pick(rng, PAYMENT_METHODS).to_string()),
    rule(Pattern::Any(&["sales rep", "manager", "customer", "owner", "assignee"]), other_person),
    rule(Pattern::Any(&["product"]), |_, rng| pick(rng, PRODUCTS).to_string()),
    rule(Pattern::Any(&["application", "app"]), |_, rng| pick(rng, APPLICATIONS).to_string()),
    rule(Pattern::Any(&["name"]), |cell, _| cell.person.full_name()),
    rule(Pattern::Any(&["role"]), |_, rng| pick(rng, ROLES).to_string()),
    rule(Pattern::Any(&["department", "team"]), |_, rng| pick(rng, DEPARTMENTS).to_string()),
    rule(Pattern::Exact("status"), up_down),
    rule(Pattern::Any(&["status"]), active_by_parity),
    rule(Pattern::Any(&["(ms)", "response time", "latency", "load time"]), millis),
    rule(Pattern::Any(&["downtime", "(min)"]), |_, rng| rng.gen_range(0..=120u32).to_string()),
    rule(Pattern::Any(&["sla"]), |_, rng| one_decimal(rng, 95.0, 100.0)),
    rule(Pattern::Any(&["error rate"]), |_, rng| one_decimal(rng, 0.0, 5.0)),
    rule(Pattern::Any(&["cpu", "memory", "disk", "(%)", "percent", "usage"]), |_, rng| {
        one_decimal(rng, 1.0, 99.0)
    }),
    rule(Pattern::Any(&["rating", "score"]), |_, rng| one_decimal(rng, 1.0, 5.0)),
    rule(Pattern::Any(&["quantity", "qty"]), |_, rng| rng.gen_range(1..=20u32).to_string()),
    rule(Pattern::Any(&["stock", "inventory"]), |_, rng| rng.gen_range(0..=500u32).to_string()),
    rule(Pattern::Any(&["discount"]), |_, rng| rng.gen_range(0..=30u32).to_string()),
    rule(Pattern::Any(&["tax"]), |_, rng| format!("{:.2}", rng.gen_range(1.0..80.0f64))),
    rule(Pattern::Any(&["price", "total", "amount", "revenue", "cost", "salary"]), |_, rng| {
        format!("{:.2}", rng.gen_range(5.0..2000.0f64))
    }),
    rule(Pattern::Any(&["category"]), |_, rng| pick(rng, CATEGORIES).to_string()),
    rule(Pattern::Any(&["brand"]), |_, rng| pick(rng, BRANDS).to_string()),
    rule(Pattern::Any(&["color", "colour"]), |_, rng| pick(rng, COLORS).to_string()),
    rule(Pattern::Any(&["weight"]), |_, rng| format!("{:.1} kg", rng.gen_range(0.1..25.0f64))),
    rule(Pattern::Any(&["dimension", "size"]), dimensions),
    rule(Pattern::Any(&["supplier", "vendor"]), |_, rng| pick(rng, SUPPLIERS).to_string()),
    rule(Pattern::Any(&["warehouse"]), |_, rng| pick(rng, WAREHOUSES).to_string()),
    rule(Pattern::Any(&["method"]), |_, rng| pick(rng, HTTP_METHODS).to_string()),
    rule(Pattern::Any(&["region"]), |_, rng| pick(rng, REGIONS).to_string()),
    rule(Pattern::Any(&["env"]), |_, rng| pick(rng, ENVS).to_string()),
    rule(Pattern::Any(&["country"]), |_, rng| pick(rng, COUNTRIES).to_string()),
    rule(Pattern::Any(&["city", "location"]), |_, rng| pick(rng, CITIES).to_string()),
    rule(Pattern::Any(&["login", "time", "created", "updated", "timestamp"]), datetime),
    rule(Pattern::Any(&["date", "joined", "release"]), date),
];

/// Synthesize `rows` rows, one cell per header.
///
/// Unmatched headers yield `Value {row}-{col}` (both 1-based).
pub fn fallback_rows(headers: &[String], rows: usize, rng: &mut dyn RngCore) -> Vec<Vec<String>> {
    let headers: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();

    (0..rows)
        .map(|row| {
            let person = Person::draw(rng);
            headers
                .iter()
                .enumerate()
                .map(|(col, header)| {
                    let cell = Cell {
                        header,
                        row,
                        person: &person,
                    };
                    match RULES.iter().find(|r| r.pattern.matches(header)) {
                        Some(rule) => (rule.synth)(&cell, rng),
                        None => format!("Value {}-{}", row + 1, col + 1),
                    }
                })
                .collect()
        })
        .collect()
}

fn pick(rng: &mut dyn RngCore, options: &'static [&'static str]) -> &'static str {
    options.choose(rng).copied().unwrap_or_default()
}

fn one_decimal(rng: &mut dyn RngCore, low: f64, high: f64) -> String {
    format!("{:.1}", rng.gen_range(low..=high))
}

fn username(cell: &Cell<'_>, _: &mut dyn RngCore) -> String {
    cell.person.slug()
}

fn email(cell: &Cell<'_>, _: &mut dyn RngCore) -> String {
    format!("{}{}@example.com", cell.person.slug(), cell.row + 1)
}

fn sequential_id(cell: &Cell<'_>, _: &mut dyn RngCore) -> String {
    format!("USR-{}", 1000 + cell.row)
}

fn sku(_: &Cell<'_>, rng: &mut dyn RngCore) -> String {
    format!("SKU-{}", rng.gen_range(10_000..100_000u32))
}

fn tracking_number(_: &Cell<'_>, rng: &mut dyn RngCore) -> String {
    format!("TRK{}", rng.gen_range(100_000_000..1_000_000_000u64))
}

fn hostname(_: &Cell<'_>, rng: &mut dyn RngCore) -> String {
    let role = pick(rng, HOST_ROLES);
    format!("{}-{:02}.prod.internal", role, rng.gen_range(1..=24u32))
}

fn endpoint(_: &Cell<'_>, rng: &mut dyn RngCore) -> String {
    format!("/api/v1/{}", pick(rng, ENDPOINT_RESOURCES))
}

fn phone(_: &Cell<'_>, rng: &mut dyn RngCore) -> String {
    format!(
        "+1-555-{:03}-{:04}",
        rng.gen_range(100..1000u32),
        rng.gen_range(0..10_000u32)
    )
}

fn street_address(_: &Cell<'_>, rng: &mut dyn RngCore) -> String {
    let street = pick(rng, STREETS);
    format!("{} {}", rng.gen_range(1..10_000u32), street)
}

fn other_person(_: &Cell<'_>, rng: &mut dyn RngCore) -> String {
    Person::draw(rng).full_name()
}

fn up_down(_: &Cell<'_>, rng: &mut dyn RngCore) -> String {
    let status = if rng.gen_bool(0.5) { "Up" } else { "Down" };
    status.to_string()
}

fn active_by_parity(cell: &Cell<'_>, _: &mut dyn RngCore) -> String {
    let status = if cell.row % 2 == 0 { "Active" } else { "Inactive" };
    status.to_string()
}

fn millis(cell: &Cell<'_>, rng: &mut dyn RngCore) -> String {
    let ms = if cell.header.contains("load") {
        rng.gen_range(200..=5000u32)
    } else {
        rng.gen_range(20..=2000u32)
    };
    ms.to_string()
}

fn dimensions(_: &Cell<'_>, rng: &mut dyn RngCore) -> String {
    format!(
        "{}x{}x{} cm",
        rng.gen_range(10..=100u32),
        rng.gen_range(10..=100u32),
        rng.gen_range(5..=60u32)
    )
}

fn date(_: &Cell<'_>, rng: &mut dyn RngCore) -> String {
    format!(
        "{}-{:02}-{:02}",
        rng.gen_range(2022..=2025u32),
        rng.gen_range(1..=12u32),
        rng.gen_range(1..=28u32)
    )
}

fn datetime(cell: &Cell<'_>, rng: &mut dyn RngCore) -> String {
    format!(
        "{} {:02}:{:02}:{:02}",
        date(cell, rng),
        rng.gen_range(0..24u32),
        rng.gen_range(0..60u32),
        rng.gen_range(0..60u32)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn synth(names: &[&str], rows: usize) -> Vec<Vec<String>> {
        let mut rng = StdRng::seed_from_u64(7);
        fallback_rows(&headers(names), rows, &mut rng)
    }

    #[test]
    fn test_dimensions_are_exact() {
        let rows = synth(&["User ID", "Name", "Email", "Mystery"], 5);
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|r| r.len() == 4));
    }

    #[test]
    fn test_identity_columns_agree() {
        let rows = synth(&["User ID", "Name", "Username", "Email"], 3);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row[0], format!("USR-{}", 1000 + i));

            let slug = row[1].replace(' ', ".").to_lowercase();
            assert_eq!(row[2], slug);
            assert_eq!(row[3], format!("{}{}@example.com", slug, i + 1));
        }
    }

    #[test]
    fn test_id_fields_share_one_sequence() {
        let rows = synth(&["Order ID", "Product ID", "id"], 2);
        assert_eq!(rows[0], vec!["USR-1000", "USR-1000", "USR-1000"]);
        assert_eq!(rows[1], vec!["USR-1001", "USR-1001", "USR-1001"]);
    }

    #[test]
    fn test_status_rules() {
        let rows = synth(&["Status", "Account Status"], 4);
        for (i, row) in rows.iter().enumerate() {
            assert!(row[0] == "Up" || row[0] == "Down");
            let expected = if i % 2 == 0 { "Active" } else { "Inactive" };
            assert_eq!(row[1], expected);
        }
    }

    #[test]
    fn test_unmatched_header_placeholder() {
        let rows = synth(&["Name", "Favourite Fruit"], 2);
        assert_eq!(rows[0][1], "Value 1-2");
        assert_eq!(rows[1][1], "Value 2-2");
    }

    #[test]
    fn test_metric_ranges() {
        let rows = synth(
            &["Response Time (ms)", "Load Time (ms)", "Downtime (min)", "SLA (%)", "CPU (%)"],
            20,
        );
        for row in rows {
            let response: u32 = row[0].parse().unwrap();
            assert!((20..=2000).contains(&response));
            let load: u32 = row[1].parse().unwrap();
            assert!((200..=5000).contains(&load));
            let downtime: u32 = row[2].parse().unwrap();
            assert!(downtime <= 120);
            let sla: f64 = row[3].parse().unwrap();
            assert!((95.0..=100.0).contains(&sla));
            assert_eq!(row[4].split('.').nth(1).map(str::len), Some(1));
        }
    }

    #[test]
    fn test_category_picks_come_from_lists() {
        let rows = synth(&["Role", "Department", "Region", "Env", "Method"], 10);
        for row in rows {
            assert!(ROLES.contains(&row[0].as_str()));
            assert!(DEPARTMENTS.contains(&row[1].as_str()));
            assert!(REGIONS.contains(&row[2].as_str()));
            assert!(ENVS.contains(&row[3].as_str()));
            assert!(HTTP_METHODS.contains(&row[4].as_str()));
        }
    }

    #[test]
    fn test_order_template_columns() {
        let rows = synth(&["Payment Method", "Shipping Address", "Sales Rep", "Tracking No"], 3);
        for row in rows {
            assert!(PAYMENT_METHODS.contains(&row[0].as_str()));
            assert!(row[1].ends_with(|c: char| c.is_alphabetic()));
            assert_eq!(row[2].split(' ').count(), 2);
            assert!(row[3].starts_with("TRK"));
        }
    }

    #[test]
    fn test_country_is_not_a_count() {
        let rows = synth(&["Country", "Discount"], 3);
        for row in rows {
            assert!(COUNTRIES.contains(&row[0].as_str()));
            assert!(row[1].parse::<u32>().is_ok());
        }
    }

    #[test]
    fn test_dates_and_times() {
        let rows = synth(&["Release Date", "Last Login"], 5);
        for row in rows {
            assert_eq!(row[0].len(), 10);
            assert_eq!(row[1].len(), 19);
        }
    }

    #[test]
    fn test_zero_rows_or_columns() {
        assert!(synth(&["Name"], 0).is_empty());
        let rows = synth(&[], 3);
        assert_eq!(rows, vec![Vec::<String>::new(); 3]);
    }
}
