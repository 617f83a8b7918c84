//! Wireframe prototype generator.
//!
//! Every prototype opens with a Login page and a Dashboard carrying the
//! domain's headline metrics. Further pages are inferred from user-story
//! wording: creation verbs yield a form, browsing verbs a list, editing verbs
//! a detail view and analytics words a report.

use tracing::debug;

use reqdraft_domain::profile;
use reqdraft_shared::{DomainId, UserStory};
use reqdraft_text::{comparison_key, escape_html};

use crate::assembler::{Document, DocumentKind, html_list};

/// Upper bound on pages per prototype, Login and Dashboard included.
pub const MAX_PAGES: usize = 8;

const FORM_WORDS: &[&str] = &["form", "create", "add", "register", "input", "submit", "capture", "new"];
const LIST_WORDS: &[&str] = &["list", "view", "browse", "search", "manage", "track"];
const DETAIL_WORDS: &[&str] = &["detail", "details", "edit", "update", "profile"];
const REPORT_WORDS: &[&str] = &["report", "reports", "analytics", "dashboard", "chart", "trend", "trends"];

// ---------------------------------------------------------------------------
// Page model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Login,
    Dashboard,
    Form,
    List,
    Detail,
    Report,
}

impl PageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Dashboard => "dashboard",
            Self::Form => "form",
            Self::List => "list",
            Self::Detail => "detail",
            Self::Report => "report",
        }
    }
}

/// A building block placed on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    Header { title: String },
    Navigation { items: Vec<String> },
    Breadcrumb { trail: Vec<String> },
    Form { fields: Vec<String>, buttons: Vec<String> },
    Table { caption: String, columns: Vec<String> },
    Stats { metrics: Vec<(String, String)> },
    Chart { title: String },
    Search { filters: Vec<String> },
    Actions { buttons: Vec<String> },
    Timeline { events: Vec<String> },
    Footer { links: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub name: String,
    pub kind: PageKind,
    /// Story that caused the page, if any.
    pub story_id: Option<String>,
    pub components: Vec<Component>,
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// Naming and field vocabulary for the thing a story is about.
struct Entity {
    triggers: &'static [&'static str],
    form_page: &'static str,
    list_page: &'static str,
    detail_page: &'static str,
    fields: &'static [&'static str],
    columns: &'static [&'static str],
}

const ENTITIES: &[Entity] = &[
    Entity {
        triggers: &["course", "courses", "curriculum", "enrolment", "enrollment"],
        form_page: "Create Course",
        list_page: "Course Catalog",
        detail_page: "Course Details",
        fields: &["Course Title", "Instructor", "Start Date", "Duration", "Description"],
        columns: &["Course", "Instructor", "Start Date", "Enrolled"],
    },
    Entity {
        triggers: &["patient", "patients", "appointment", "appointments"],
        form_page: "Register Patient",
        list_page: "Patient List",
        detail_page: "Patient Record",
        fields: &["Full Name", "Date of Birth", "Contact Number", "Insurance ID"],
        columns: &["Patient", "MRN", "Last Visit", "Status"],
    },
    Entity {
        triggers: &["claim", "claims"],
        form_page: "Register Claim",
        list_page: "Claims Queue",
        detail_page: "Claim Details",
        fields: &["Policy Number", "Incident Date", "Claim Amount", "Description"],
        columns: &["Claim", "Policy", "Amount", "Status"],
    },
    Entity {
        triggers: &["policy", "policies", "quote", "quotes", "premium"],
        form_page: "New Policy",
        list_page: "Policy List",
        detail_page: "Policy Details",
        fields: &["Policyholder", "Product", "Sum Insured", "Start Date"],
        columns: &["Policy", "Holder", "Premium", "Renewal"],
    },
    Entity {
        triggers: &["subscriber", "subscribers", "sim", "activation", "porting", "plan", "plans"],
        form_page: "Activate Subscriber",
        list_page: "Subscriber List",
        detail_page: "Subscriber Profile",
        fields: &["MSISDN", "SIM Number", "Plan", "KYC Document"],
        columns: &["Subscriber", "MSISDN", "Plan", "Status"],
    },
    Entity {
        triggers: &["shipment", "shipments", "delivery", "deliveries", "dispatch", "shipping"],
        form_page: "Create Shipment",
        list_page: "Shipment Tracker",
        detail_page: "Shipment Details",
        fields: &["Origin", "Destination", "Carrier", "Weight", "Pickup Date"],
        columns: &["Shipment", "Carrier", "ETA", "Status"],
    },
    Entity {
        triggers: &["invoice", "invoices", "billing", "payment", "payments"],
        form_page: "Create Invoice",
        list_page: "Invoice List",
        detail_page: "Invoice Details",
        fields: &["Vendor", "Invoice Number", "Amount", "Due Date"],
        columns: &["Invoice", "Vendor", "Amount", "Due"],
    },
    Entity {
        triggers: &["customer", "customers", "contact", "contacts", "lead", "leads", "account", "accounts"],
        form_page: "Add Customer/Contact",
        list_page: "Customer/Contact List",
        detail_page: "Customer Profile",
        fields: &["Name", "Email", "Phone", "Company", "Source"],
        columns: &["Name", "Company", "Owner", "Stage"],
    },
    Entity {
        triggers: &["product", "products", "catalog", "catalogue", "inventory", "sku"],
        form_page: "Add Product",
        list_page: "Product Catalog",
        detail_page: "Product Details",
        fields: &["Product Name", "SKU", "Price", "Stock", "Category"],
        columns: &["Product", "SKU", "Price", "Stock"],
    },
    Entity {
        triggers: &["order", "orders", "purchase", "purchases", "checkout", "cart"],
        form_page: "Create Order",
        list_page: "Order History",
        detail_page: "Order Details",
        fields: &["Customer", "Items", "Quantity", "Delivery Address"],
        columns: &["Order", "Customer", "Total", "Status"],
    },
];

static GENERIC_ENTITY: Entity = Entity {
    triggers: &[],
    form_page: "Create New Item",
    list_page: "Item List",
    detail_page: "Item Details",
    fields: &["Name", "Category", "Owner", "Notes"],
    columns: &["Name", "Category", "Owner", "Updated"],
};

fn story_words(story: &UserStory) -> Vec<String> {
    let text = format!(
        "{} {} {}",
        story.title,
        story.description,
        story.acceptance_criteria.join(" ")
    );
    comparison_key(&text)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn mentions(words: &[String], vocabulary: &[&str]) -> bool {
    words.iter().any(|w| vocabulary.contains(&w.as_str()))
}

fn entity_for(words: &[String]) -> &'static Entity {
    ENTITIES
        .iter()
        .find(|e| mentions(words, e.triggers))
        .unwrap_or(&GENERIC_ENTITY)
}

// ---------------------------------------------------------------------------
// Page builders
// ---------------------------------------------------------------------------

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn navigation() -> Component {
    Component::Navigation {
        items: strings(&["Home", "Manage", "Reports", "Settings"]),
    }
}

fn breadcrumb(page: &str) -> Component {
    Component::Breadcrumb {
        trail: vec!["Home".to_string(), page.to_string()],
    }
}

fn login_page(project: &str) -> Page {
    Page {
        name: "Login".to_string(),
        kind: PageKind::Login,
        story_id: None,
        components: vec![
            Component::Header {
                title: project.to_string(),
            },
            Component::Form {
                fields: strings(&["Email or Username", "Password"]),
                buttons: strings(&["Sign In", "Forgot Password"]),
            },
            Component::Footer {
                links: strings(&["Terms", "Privacy", "Support"]),
            },
        ],
    }
}

fn dashboard_page(project: &str, domain: DomainId) -> Page {
    let p = profile(domain);
    Page {
        name: "Dashboard".to_string(),
        kind: PageKind::Dashboard,
        story_id: None,
        components: vec![
            Component::Header {
                title: format!("{project} Dashboard"),
            },
            navigation(),
            Component::Stats {
                metrics: p
                    .dashboard_metrics
                    .iter()
                    .map(|(label, value)| (label.to_string(), value.to_string()))
                    .collect(),
            },
            Component::Chart {
                title: "Trends (last 30 days)".to_string(),
            },
            Component::Table {
                caption: "Recent Activity".to_string(),
                columns: strings(&["Item", "Owner", "Status", "Updated"]),
            },
            Component::Actions {
                buttons: strings(p.quick_actions),
            },
        ],
    }
}

fn story_page(kind: PageKind, entity: &Entity, story_id: &str) -> Page {
    let (name, body) = match kind {
        PageKind::Form => (
            entity.form_page.to_string(),
            vec![Component::Form {
                fields: strings(entity.fields),
                buttons: strings(&["Save", "Cancel"]),
            }],
        ),
        PageKind::List => (
            entity.list_page.to_string(),
            vec![
                Component::Search {
                    filters: strings(&["Status", "Owner", "Date"]),
                },
                Component::Table {
                    caption: entity.list_page.to_string(),
                    columns: strings(entity.columns),
                },
                Component::Actions {
                    buttons: strings(&["Add New", "Export"]),
                },
            ],
        ),
        PageKind::Detail => (
            entity.detail_page.to_string(),
            vec![
                Component::Form {
                    fields: strings(entity.fields),
                    buttons: strings(&["Edit", "Back"]),
                },
                Component::Timeline {
                    events: strings(&["Created", "Updated", "Reviewed"]),
                },
            ],
        ),
        PageKind::Report | PageKind::Login | PageKind::Dashboard => (
            "Reports & Analytics".to_string(),
            vec![
                Component::Search {
                    filters: strings(&["Date Range", "Segment"]),
                },
                Component::Chart {
                    title: "Performance Overview".to_string(),
                },
                Component::Table {
                    caption: "Summary".to_string(),
                    columns: strings(&["Metric", "Current", "Previous", "Change"]),
                },
                Component::Actions {
                    buttons: strings(&["Export PDF", "Schedule Report"]),
                },
            ],
        ),
    };

    let mut components = vec![
        Component::Header { title: name.clone() },
        navigation(),
        breadcrumb(&name),
    ];
    components.extend(body);
    Page {
        name,
        kind,
        story_id: Some(story_id.to_string()),
        components,
    }
}

/// Pages a single story calls for, in form/list/detail/report order.
fn pages_for_story(story: &UserStory) -> Vec<Page> {
    let words = story_words(story);
    let entity = entity_for(&words);
    let mut pages = Vec::new();
    for (kind, vocabulary) in [
        (PageKind::Form, FORM_WORDS),
        (PageKind::List, LIST_WORDS),
        (PageKind::Detail, DETAIL_WORDS),
        (PageKind::Report, REPORT_WORDS),
    ] {
        if mentions(&words, vocabulary) {
            pages.push(story_page(kind, entity, &story.id));
        }
    }
    pages
}

/// Plan the pages of a prototype: Login, Dashboard, then story-driven pages
/// deduplicated by name and capped at [`MAX_PAGES`].
pub fn plan_pages(project: &str, stories: &[UserStory], domain: DomainId) -> Vec<Page> {
    let mut pages = vec![login_page(project), dashboard_page(project, domain)];
    for story in stories {
        for page in pages_for_story(story) {
            if pages.len() >= MAX_PAGES {
                debug!(story = %story.id, "page cap reached");
                return pages;
            }
            if pages.iter().all(|existing| existing.name != page.name) {
                pages.push(page);
            }
        }
    }
    pages
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn buttons_html(buttons: &[String]) -> String {
    buttons
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let class = if i == 0 { "primary" } else { "secondary" };
            format!("<button type=\"button\" class=\"{class}\">{}</button>", escape_html(b))
        })
        .collect::<Vec<_>>()
        .join("")
}

fn render_component(component: &Component) -> String {
    match component {
        Component::Header { title } => {
            format!("<div class=\"wf-header\"><h3>{}</h3></div>", escape_html(title))
        }
        Component::Navigation { items } => {
            let links: String = items
                .iter()
                .map(|i| format!("<a href=\"#\">{}</a>", escape_html(i)))
                .collect();
            format!("<nav class=\"wf-navigation\">{links}</nav>")
        }
        Component::Breadcrumb { trail } => {
            let escaped: Vec<String> = trail.iter().map(|t| escape_html(t)).collect();
            format!("<div class=\"wf-breadcrumb\">{}</div>", escaped.join(" &gt; "))
        }
        Component::Form { fields, buttons } => {
            let mut out = String::from("<form class=\"wf-form\">\n");
            for field in fields {
                let f = escape_html(field);
                out.push_str(&format!(
                    "<label>{f}<input type=\"text\" placeholder=\"{f}\" readonly></label>\n"
                ));
            }
            out.push_str(&format!("<div class=\"wf-buttons\">{}</div>\n</form>", buttons_html(buttons)));
            out
        }
        Component::Table { caption, columns } => {
            let mut out = format!(
                "<table class=\"wf-table\">\n<caption>{}</caption>\n<thead><tr>",
                escape_html(caption)
            );
            for c in columns {
                out.push_str(&format!("<th>{}</th>", escape_html(c)));
            }
            out.push_str("</tr></thead>\n<tbody>\n");
            for _ in 0..3 {
                out.push_str("<tr>");
                out.push_str(&"<td>&hellip;</td>".repeat(columns.len()));
                out.push_str("</tr>\n");
            }
            out.push_str("</tbody>\n</table>");
            out
        }
        Component::Stats { metrics } => {
            let mut out = String::from("<div class=\"wf-stats\">\n");
            for (label, value) in metrics {
                out.push_str(&format!(
                    "<div class=\"stat-card\"><span class=\"stat-value\">{}</span><span class=\"stat-label\">{}</span></div>\n",
                    escape_html(value),
                    escape_html(label)
                ));
            }
            out.push_str("</div>");
            out
        }
        Component::Chart { title } => format!(
            "<div class=\"wf-chart\"><span class=\"chart-title\">{}</span><div class=\"chart-area\"></div></div>",
            escape_html(title)
        ),
        Component::Search { filters } => {
            let chips: String = filters
                .iter()
                .map(|f| format!("<span class=\"filter\">{}</span>", escape_html(f)))
                .collect();
            format!(
                "<div class=\"wf-search\"><input type=\"search\" placeholder=\"Search\" readonly>{chips}</div>"
            )
        }
        Component::Actions { buttons } => {
            format!("<div class=\"wf-actions\">{}</div>", buttons_html(buttons))
        }
        Component::Timeline { events } => html_list("ol", "wf-timeline", events),
        Component::Footer { links } => {
            let links: String = links
                .iter()
                .map(|l| format!("<a href=\"#\">{}</a>", escape_html(l)))
                .collect();
            format!("<footer class=\"wf-footer\">{links}</footer>")
        }
    }
}

fn render_page(page: &Page) -> String {
    let mut out = format!("<div class=\"wireframe-page\" data-page-kind=\"{}\"", page.kind.as_str());
    if let Some(story) = &page.story_id {
        out.push_str(&format!(" data-story=\"{}\"", escape_html(story)));
    }
    out.push_str(">\n");
    for component in &page.components {
        out.push_str(&render_component(component));
        out.push('\n');
    }
    out.push_str("</div>");
    out
}

/// Assemble a wireframe document: a page index followed by one section per
/// page.
pub fn assemble_wireframes(project: &str, stories: &[UserStory], domain: DomainId) -> Document {
    let pages = plan_pages(project, stories, domain);
    let mut doc = Document::new(DocumentKind::Wireframes, project, 1, domain, None);

    let index: Vec<String> = pages
        .iter()
        .map(|p| match &p.story_id {
            Some(story) => format!("{} ({}, from {story})", p.name, p.kind.as_str()),
            None => format!("{} ({})", p.name, p.kind.as_str()),
        })
        .collect();
    doc.push("pages", "Pages", html_list("ol", "wireframe-index", &index));

    for (i, page) in pages.iter().enumerate() {
        doc.push(format!("page-{}", i + 1), page.name.clone(), render_page(page));
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(id: &str, description: &str) -> UserStory {
        UserStory {
            id: id.to_string(),
            title: String::new(),
            description: description.to_string(),
            acceptance_criteria: Vec::new(),
        }
    }

    fn names(pages: &[Page]) -> Vec<&str> {
        pages.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn always_starts_with_login_and_dashboard() {
        let pages = plan_pages("Portal", &[], DomainId::Generic);
        assert_eq!(names(&pages), vec!["Login", "Dashboard"]);
        assert_eq!(pages[0].kind, PageKind::Login);
    }

    #[test]
    fn infers_pages_from_story_verbs() {
        let stories = [
            story("US-001", "As an instructor, I want to create a course so that learners can enrol."),
            story("US-002", "As a learner, I want to browse courses so that I can pick one."),
        ];
        let pages = plan_pages("Academy", &stories, DomainId::Education);
        assert_eq!(
            names(&pages),
            vec!["Login", "Dashboard", "Create Course", "Course Catalog"]
        );
        assert_eq!(pages[2].story_id.as_deref(), Some("US-001"));
    }

    #[test]
    fn unknown_entities_use_generic_names() {
        let stories = [story("US-001", "As a clerk, I want to edit the record details.")];
        let pages = plan_pages("Desk", &stories, DomainId::Generic);
        assert_eq!(names(&pages), vec!["Login", "Dashboard", "Item Details"]);
    }

    #[test]
    fn dedupes_pages_and_caps_count() {
        let stories = [
            story("US-001", "I want to add a customer and view the customer list."),
            story("US-002", "I want to add a contact."),
            story("US-003", "I want to create an order, browse order history, edit order details."),
            story("US-004", "I want to add products and search the catalog."),
            story("US-005", "I want analytics reports."),
        ];
        let pages = plan_pages("Shop", &stories, DomainId::Ecommerce);
        assert_eq!(pages.len(), MAX_PAGES);
        let listed = names(&pages);
        let mut unique = listed.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), listed.len());
        assert_eq!(listed[2], "Add Customer/Contact");
        assert_eq!(listed[3], "Customer/Contact List");
    }

    #[test]
    fn dashboard_carries_domain_metrics_and_actions() {
        let doc = assemble_wireframes("Clinic", &[], DomainId::Healthcare);
        let html = doc.to_html();
        assert!(html.contains("Appointments Today"));
        assert!(html.contains("Register Patient"));
        assert!(html.contains("data-kind=\"wireframes\""));
        assert_eq!(doc.sections.len(), 3);
        assert_eq!(doc.sections[1].id, "page-1");
    }

    #[test]
    fn rendered_pages_escape_text() {
        let doc = assemble_wireframes("R&D <Lab>", &[], DomainId::Generic);
        let html = doc.to_html();
        assert!(html.contains("R&amp;D &lt;Lab&gt;"));
        assert!(!html.contains("<Lab>"));
    }
}
