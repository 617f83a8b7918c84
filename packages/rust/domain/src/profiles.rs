//! The built-in domain table.
//!
//! Entries are listed in classifier priority order and must match the order of
//! [`DomainId::ALL`]; `GENERIC` is last and carries no keywords.

use reqdraft_shared::{DomainId, Level};

use crate::{DomainProfile, KpiTemplate, RiskTemplate};

pub(crate) static PROFILES: [DomainProfile; 10] = [
    INSURANCE, HEALTHCARE, TELECOM, BANKING, FINANCE, ECOMMERCE, CRM, EDUCATION, LOGISTICS,
    GENERIC,
];

// ---------------------------------------------------------------------------
// Insurance
// ---------------------------------------------------------------------------

const INSURANCE: DomainProfile = DomainProfile {
    id: DomainId::Insurance,
    keywords: &[
        ("insurance", 4),
        ("underwriting", 4),
        ("policyholder", 4),
        ("reinsurance", 4),
        ("policy", 3),
        ("policies", 3),
        ("claim", 3),
        ("premium", 3),
        ("underwriter", 3),
        ("insurer", 3),
        ("deductible", 3),
        ("actuarial", 3),
        ("sum assured", 3),
        ("coverage", 2),
        ("insured", 2),
        ("endorsement", 2),
        ("beneficiary", 1),
        ("broker", 1),
    ],
    stakeholders: &[
        "Policyholders",
        "Insurance agents and brokers",
        "Underwriters",
        "Claims adjusters",
        "Actuaries",
        "Compliance officers",
    ],
    channels: "agent portal, customer self-service web and mobile, call centre",
    personas: &["policyholder", "underwriter", "claims adjuster", "insurance agent"],
    outcome: "policy retention and claims turnaround",
    validation_rules: &[
        "Enforce policyholder identity verification and eligibility checks before binding cover",
        "Validate claim documentation against active coverage and policy limits",
        "Require underwriting approval for risks outside the automatic acceptance rules",
        "Enforce premium calculation against the filed rating tables",
        "Enforce compliance with insurance regulatory reporting standards",
    ],
    scope: &[
        "Quote, bind and issue policies across supported product lines",
        "First notice of loss and end-to-end claims handling",
        "Premium billing, collections and renewals",
        "Agent and broker self-service portal",
    ],
    objectives: &[
        "Reduce quote-to-bind cycle time for standard risks",
        "Shorten average claims settlement time",
        "Improve policy retention at renewal",
    ],
    kpis: &[
        KpiTemplate {
            name: "Quote-to-Bind Ratio",
            formula: "Policies bound / Quotes issued x 100",
            target: "+15% within 2 quarters",
            frequency: "Monthly",
        },
        KpiTemplate {
            name: "Claims Cycle Time",
            formula: "Average days from first notice of loss to settlement",
            target: "-25% within 2 quarters",
            frequency: "Weekly",
        },
        KpiTemplate {
            name: "Renewal Retention Rate",
            formula: "Policies renewed / Policies due for renewal x 100",
            target: ">= 85%",
            frequency: "Monthly",
        },
    ],
    risks: &[
        RiskTemplate {
            title: "Regulatory change in rating or disclosure rules",
            description: "Rating, disclosure or solvency rules change during delivery and invalidate configured products.",
            likelihood: Level::Medium,
            impact: Level::High,
            mitigation: "Track regulator bulletins and keep product rules configurable rather than coded.",
            contingency: "Freeze affected product launches and apply interim manual referral.",
        },
        RiskTemplate {
            title: "Legacy policy administration integration",
            description: "The existing policy administration system exposes limited or undocumented interfaces.",
            likelihood: Level::High,
            impact: Level::Medium,
            mitigation: "Run an interface discovery spike and agree contracts before build.",
            contingency: "Introduce a batch file bridge for the first release.",
        },
    ],
    nfrs: &[
        "Regulatory compliance: data retention mandates, audit trails for every policy and claim change.",
        "Performance: quote generation under 30 seconds; policy issuance under 5 minutes.",
        "Security: PII protection, fraud screening on claims, role-based access to underwriting data.",
    ],
    data_entities: &[
        "Policy",
        "Policyholder",
        "Coverage",
        "Premium",
        "Claim",
        "Agent",
        "Underwriting Decision",
    ],
    interfaces: &[
        "Rating engine for premium calculation",
        "Payment gateway for card and bank transfer collections",
        "Regulatory reporting submissions",
        "Third-party data: credit bureau and prior claims history",
    ],
    dashboard_metrics: &[
        ("Active Policies", "12,480"),
        ("Open Claims", "342"),
        ("Premium Collected (MTD)", "1.8M"),
        ("Renewals Due", "615"),
    ],
    quick_actions: &["New Quote", "Register Claim", "Renew Policy", "Search Policyholder"],
};

// ---------------------------------------------------------------------------
// Healthcare
// ---------------------------------------------------------------------------

const HEALTHCARE: DomainProfile = DomainProfile {
    id: DomainId::Healthcare,
    keywords: &[
        ("hipaa", 5),
        ("patient", 4),
        ("ehr", 4),
        ("emr", 4),
        ("healthcare", 4),
        ("telehealth", 4),
        ("hl7", 4),
        ("fhir", 4),
        ("clinical", 3),
        ("physician", 3),
        ("hospital", 3),
        ("diagnosis", 3),
        ("prescription", 3),
        ("medical", 3),
        ("lab result", 3),
        ("care plan", 3),
        ("doctor", 2),
        ("nurse", 2),
        ("pharmacy", 2),
        ("appointment", 1),
    ],
    stakeholders: &[
        "Patients",
        "Front-desk staff",
        "Clinicians",
        "Billing staff",
        "IT and compliance",
        "Payers",
    ],
    channels: "web, clinic desktop, patient mobile app",
    personas: &["patient", "clinician", "front-desk coordinator", "billing specialist"],
    outcome: "patient satisfaction and care quality",
    validation_rules: &[
        "Enforce mandatory patient demographic fields (name, date of birth, medical record number)",
        "Validate access to medical records against HIPAA minimum-necessary rules",
        "Require physician authorization for prescription access and changes",
        "Enforce audit trails for all patient data modifications",
        "Validate appointment slots against clinician availability before confirmation",
    ],
    scope: &[
        "Patient registration and demographic management",
        "Appointment scheduling and reminders",
        "Clinical documentation and care plans",
        "Insurance eligibility checks and claims submission",
    ],
    objectives: &[
        "Reduce patient wait time for appointments",
        "Improve completeness of clinical documentation",
        "Reduce claim denials caused by eligibility errors",
    ],
    kpis: &[
        KpiTemplate {
            name: "Average Appointment Wait Time",
            formula: "Mean days between booking request and appointment",
            target: "-20% within 2 quarters",
            frequency: "Weekly",
        },
        KpiTemplate {
            name: "Documentation Completeness",
            formula: "Encounters with complete notes / Total encounters x 100",
            target: ">= 95%",
            frequency: "Monthly",
        },
        KpiTemplate {
            name: "Claim Denial Rate",
            formula: "Denied claims / Submitted claims x 100",
            target: "<= 5%",
            frequency: "Monthly",
        },
    ],
    risks: &[
        RiskTemplate {
            title: "Protected health information exposure",
            description: "PHI is exposed through misconfigured access, logs or integrations.",
            likelihood: Level::Medium,
            impact: Level::High,
            mitigation: "Encrypt PHI at rest and in transit; run access reviews and privacy impact assessments.",
            contingency: "Execute the breach notification procedure and revoke affected credentials.",
        },
        RiskTemplate {
            title: "EHR interoperability gaps",
            description: "Connected EHR systems implement HL7/FHIR resources inconsistently.",
            likelihood: Level::High,
            impact: Level::Medium,
            mitigation: "Certify each interface against a conformance test suite before go-live.",
            contingency: "Fall back to scheduled document exchange for non-conforming systems.",
        },
    ],
    nfrs: &[
        "Security and privacy: PHI encrypted at rest and in transit; role-based access; audit logging aligned to HIPAA.",
        "Performance and availability: appointment search under 2 s p95; patient record open under 3 s p95; 99.5% monthly availability.",
        "Usability and accessibility: WCAG 2.1 AA for patient-facing screens; keyboard navigation for clinical workflows.",
    ],
    data_entities: &[
        "Patient",
        "Appointment",
        "Provider",
        "Encounter",
        "Medical History Entry",
        "Insurance Policy",
        "Claim",
    ],
    interfaces: &[
        "EHR via HL7 v2 / FHIR (Patient, Encounter, Observation)",
        "Payer clearinghouse: X12 270/271 eligibility, 837 claims, 835 remittance",
        "Payment gateway for patient co-pays",
    ],
    dashboard_metrics: &[
        ("Appointments Today", "86"),
        ("Patients Checked In", "41"),
        ("Pending Lab Results", "17"),
        ("Claims Awaiting Submission", "23"),
    ],
    quick_actions: &["Register Patient", "Book Appointment", "Record Vitals", "Submit Claim"],
};

// ---------------------------------------------------------------------------
// Telecom
// ---------------------------------------------------------------------------

const TELECOM: DomainProfile = DomainProfile {
    id: DomainId::Telecom,
    keywords: &[
        ("telecom", 4),
        ("telecommunications", 4),
        ("msisdn", 4),
        ("sim activation", 4),
        ("number porting", 4),
        ("call detail record", 4),
        ("cdr", 4),
        ("subscriber", 3),
        ("sim", 3),
        ("roaming", 3),
        ("postpaid", 3),
        ("network usage", 3),
        ("mobile plan", 3),
        ("bss", 3),
        ("prepaid", 2),
        ("tariff", 2),
        ("porting", 2),
        ("charging", 2),
        ("5g", 2),
    ],
    stakeholders: &[
        "Subscribers",
        "Retail and dealer staff",
        "Customer care agents",
        "Billing operations",
        "Network operations",
        "Regulatory affairs",
    ],
    channels: "self-care app, web, retail stores, dealer portal, call centre",
    personas: &["subscriber", "retail agent", "billing analyst", "customer care agent"],
    outcome: "subscriber growth and average revenue per user",
    validation_rules: &[
        "Enforce subscriber identity verification before SIM activation",
        "Validate rated usage records against the active tariff plan before invoicing",
        "Require number porting requests to carry a valid authorization code",
        "Enforce credit limit checks on postpaid accounts before service upgrades",
    ],
    scope: &[
        "Subscriber onboarding and SIM activation",
        "Plan catalogue and tariff management",
        "Usage rating, billing and charging",
        "Self-care for plan changes and top-ups",
    ],
    objectives: &[
        "Reduce SIM activation turnaround time",
        "Reduce billing disputes caused by rating errors",
        "Increase self-care adoption for plan changes",
    ],
    kpis: &[
        KpiTemplate {
            name: "Activation Turnaround",
            formula: "Median minutes from order to active SIM",
            target: "<= 30 minutes",
            frequency: "Daily",
        },
        KpiTemplate {
            name: "Billing Dispute Rate",
            formula: "Disputed invoices / Issued invoices x 100",
            target: "<= 1%",
            frequency: "Monthly",
        },
        KpiTemplate {
            name: "Self-care Adoption",
            formula: "Plan changes via self-care / Total plan changes x 100",
            target: ">= 60%",
            frequency: "Monthly",
        },
    ],
    risks: &[
        RiskTemplate {
            title: "Rating and charging errors",
            description: "Tariff misconfiguration produces incorrect charges at scale.",
            likelihood: Level::Medium,
            impact: Level::High,
            mitigation: "Shadow-rate a sample of usage against the legacy engine before cut-over.",
            contingency: "Suspend invoice release and issue corrective credits.",
        },
        RiskTemplate {
            title: "Network and provisioning dependencies",
            description: "Activation depends on HLR/HSS provisioning interfaces owned by other teams.",
            likelihood: Level::Medium,
            impact: Level::Medium,
            mitigation: "Agree provisioning SLAs and stub the interfaces for early testing.",
            contingency: "Queue activations for batch provisioning during outages.",
        },
    ],
    nfrs: &[
        "Performance: activation orders processed end to end within 30 minutes; rating throughput sized for peak-hour CDR volume.",
        "Availability: 99.95% for charging and self-care top-up.",
        "Compliance: lawful retention of usage records; subscriber identity checks per regulator.",
    ],
    data_entities: &[
        "Subscriber",
        "SIM",
        "Tariff Plan",
        "Usage Record",
        "Invoice",
        "Port Request",
    ],
    interfaces: &[
        "Network provisioning (HLR/HSS) for activation",
        "Mediation feed of call detail records",
        "Number portability clearinghouse",
        "Payment gateway for top-ups",
    ],
    dashboard_metrics: &[
        ("Active Subscribers", "1.2M"),
        ("Activations Today", "3,410"),
        ("Open Port Requests", "212"),
        ("Disputed Invoices", "87"),
    ],
    quick_actions: &["Activate SIM", "Change Plan", "Top Up", "Raise Dispute"],
};

// ---------------------------------------------------------------------------
// Banking
// ---------------------------------------------------------------------------

const BANKING: DomainProfile = DomainProfile {
    id: DomainId::Banking,
    keywords: &[
        ("banking", 4),
        ("core banking", 4),
        ("aml", 4),
        ("anti-money laundering", 4),
        ("bank", 3),
        ("loan", 3),
        ("mortgage", 3),
        ("kyc", 3),
        ("teller", 3),
        ("atm", 3),
        ("overdraft", 3),
        ("fund transfer", 3),
        ("savings account", 3),
        ("iban", 3),
        ("deposit", 2),
        ("debit card", 2),
        ("credit card", 2),
        ("account", 1),
        ("branch", 1),
    ],
    stakeholders: &[
        "Account holders",
        "Branch staff",
        "Relationship managers",
        "Operations team",
        "Compliance officers",
        "IT and security",
    ],
    channels: "web, mobile, ATM, branch",
    personas: &["account holder", "relationship manager", "operations officer", "compliance officer"],
    outcome: "customer trust and digital transaction volume",
    validation_rules: &[
        "Enforce strong customer authentication and account verification",
        "Validate transaction limits and fraud detection rules before posting",
        "Require KYC completion before account activation",
        "Enforce real-time balance verification before debits",
    ],
    scope: &[
        "Digital account opening with KYC",
        "Fund transfers and bill payments",
        "Loan application and servicing",
        "Statements and transaction history",
    ],
    objectives: &[
        "Increase digitally originated accounts",
        "Reduce manual effort in KYC verification",
        "Reduce fraud losses on digital channels",
    ],
    kpis: &[
        KpiTemplate {
            name: "Digital Account Openings",
            formula: "Accounts opened digitally / Total accounts opened x 100",
            target: "+20% within 2 quarters",
            frequency: "Monthly",
        },
        KpiTemplate {
            name: "KYC Turnaround",
            formula: "Median hours from application to KYC decision",
            target: "<= 24 hours",
            frequency: "Weekly",
        },
        KpiTemplate {
            name: "Fraud Loss Rate",
            formula: "Fraud losses / Digital transaction value x 100",
            target: "-30% year on year",
            frequency: "Monthly",
        },
    ],
    risks: &[
        RiskTemplate {
            title: "Regulatory non-compliance",
            description: "KYC, AML or data residency obligations are not met by the new flows.",
            likelihood: Level::Medium,
            impact: Level::High,
            mitigation: "Involve compliance in design reviews and maintain a controls traceability matrix.",
            contingency: "Disable affected journeys and route customers to assisted channels.",
        },
        RiskTemplate {
            title: "Core banking integration latency",
            description: "Core banking APIs cannot meet real-time response expectations.",
            likelihood: Level::Medium,
            impact: Level::Medium,
            mitigation: "Load-test core APIs early and cache read-mostly data.",
            contingency: "Move non-critical postings to asynchronous processing.",
        },
    ],
    nfrs: &[
        "Security: multi-factor authentication, encryption in transit and at rest, fraud monitoring.",
        "Performance: transaction processing under 3 s; balance inquiry under 1 s; 99.9% availability in business hours.",
        "Compliance: PCI DSS for card data, immutable audit trails, regulatory reporting.",
    ],
    data_entities: &[
        "Customer",
        "Account",
        "Transaction",
        "Beneficiary",
        "Loan",
        "Statement",
    ],
    interfaces: &[
        "Core banking account and posting APIs",
        "Payment rails for domestic and cross-border transfers",
        "KYC and AML screening services",
        "Credit bureau for loan decisions",
    ],
    dashboard_metrics: &[
        ("Accounts Opened (MTD)", "2,140"),
        ("Transfers Today", "18,905"),
        ("Pending KYC Reviews", "64"),
        ("Fraud Alerts", "9"),
    ],
    quick_actions: &["Open Account", "Transfer Funds", "Review KYC", "Apply for Loan"],
};

// ---------------------------------------------------------------------------
// Finance & accounting
// ---------------------------------------------------------------------------

const FINANCE: DomainProfile = DomainProfile {
    id: DomainId::Finance,
    keywords: &[
        ("accounts payable", 4),
        ("accounts receivable", 4),
        ("general ledger", 4),
        ("chart of accounts", 4),
        ("month-end close", 4),
        ("gaap", 4),
        ("ifrs", 4),
        ("reconciliation", 3),
        ("journal entry", 3),
        ("journal entries", 3),
        ("fixed asset", 3),
        ("treasury", 3),
        ("financial reporting", 3),
        ("mutual fund", 3),
        ("ledger", 2),
        ("invoice", 2),
        ("ap", 2),
        ("ar", 2),
        ("gl", 2),
        ("budgeting", 2),
        ("portfolio", 2),
        ("payment", 1),
    ],
    stakeholders: &[
        "Finance controllers",
        "Accounts payable clerks",
        "Accounts receivable team",
        "Treasury",
        "Auditors",
        "Business unit heads",
    ],
    channels: "web, ERP, email approvals",
    personas: &["finance controller", "AP clerk", "AR analyst", "auditor"],
    outcome: "close speed and reporting accuracy",
    validation_rules: &[
        "Enforce three-way match between purchase order, goods receipt and invoice before payment",
        "Validate journal entries balance to zero before posting",
        "Require dual approval for payments above the delegated authority limit",
        "Enforce period locks after month-end close",
    ],
    scope: &[
        "Invoice capture and accounts payable processing",
        "Customer billing and accounts receivable",
        "General ledger postings and period close",
        "Financial reporting and reconciliations",
    ],
    objectives: &[
        "Shorten the month-end close",
        "Reduce manual invoice processing",
        "Improve reconciliation accuracy",
    ],
    kpis: &[
        KpiTemplate {
            name: "Days to Close",
            formula: "Business days from period end to ledger lock",
            target: "<= 5 days",
            frequency: "Monthly",
        },
        KpiTemplate {
            name: "Touchless Invoice Rate",
            formula: "Invoices posted without manual intervention / Total invoices x 100",
            target: ">= 70%",
            frequency: "Monthly",
        },
        KpiTemplate {
            name: "Unreconciled Items",
            formula: "Count of open reconciliation breaks older than 30 days",
            target: "-50% within 2 quarters",
            frequency: "Monthly",
        },
    ],
    risks: &[
        RiskTemplate {
            title: "Segregation of duties conflicts",
            description: "Role design lets one user both create and approve financial transactions.",
            likelihood: Level::Medium,
            impact: Level::High,
            mitigation: "Run an SoD conflict matrix review on every role change.",
            contingency: "Introduce compensating detective controls and periodic audits.",
        },
        RiskTemplate {
            title: "Opening balance migration errors",
            description: "Ledger balances migrated from the legacy system do not reconcile.",
            likelihood: Level::Medium,
            impact: Level::High,
            mitigation: "Perform trial migrations with sign-off on trial balance parity.",
            contingency: "Run parallel books for one period.",
        },
    ],
    nfrs: &[
        "Auditability: every posting traceable to source document and approver.",
        "Performance: period-close batch jobs complete within 2 hours.",
        "Compliance: reporting aligned to the applicable accounting framework (GAAP or IFRS).",
    ],
    data_entities: &[
        "Vendor",
        "Invoice",
        "Purchase Order",
        "Journal Entry",
        "Ledger Account",
        "Payment",
    ],
    interfaces: &[
        "ERP purchasing and inventory modules",
        "Bank statement feeds for reconciliation",
        "Tax engine",
        "Reporting warehouse",
    ],
    dashboard_metrics: &[
        ("Invoices Pending Approval", "128"),
        ("Overdue Receivables", "412K"),
        ("Open Reconciliation Items", "37"),
        ("Days to Close (Last Period)", "6"),
    ],
    quick_actions: &["Capture Invoice", "Post Journal", "Run Reconciliation", "Close Period"],
};

// ---------------------------------------------------------------------------
// E-commerce & retail
// ---------------------------------------------------------------------------

const ECOMMERCE: DomainProfile = DomainProfile {
    id: DomainId::Ecommerce,
    keywords: &[
        ("ecommerce", 4),
        ("e-commerce", 4),
        ("checkout", 4),
        ("shopping cart", 4),
        ("storefront", 4),
        ("online store", 4),
        ("cart", 3),
        ("sku", 3),
        ("shopper", 3),
        ("product listing", 3),
        ("order fulfillment", 3),
        ("catalog", 2),
        ("catalogue", 2),
        ("marketplace", 2),
        ("coupon", 2),
        ("merchandising", 2),
        ("retail", 2),
        ("inventory", 1),
    ],
    stakeholders: &[
        "Customers",
        "Store managers",
        "Merchandisers",
        "Inventory managers",
        "Customer service team",
        "Fulfilment partners",
    ],
    channels: "web, mobile app, email, marketplace listings",
    personas: &["shopper", "store manager", "merchandiser", "customer service agent"],
    outcome: "conversion rate and average order value",
    validation_rules: &[
        "Enforce product inventory validation before order confirmation",
        "Validate shipping address and payment method before checkout completes",
        "Require secure payment authorization for every order",
        "Enforce coupon eligibility and usage limits at checkout",
    ],
    scope: &[
        "Product catalogue and search",
        "Cart, checkout and payments",
        "Order management and fulfilment tracking",
        "Returns and refunds",
    ],
    objectives: &[
        "Increase checkout conversion",
        "Increase average order value",
        "Reduce cart abandonment",
    ],
    kpis: &[
        KpiTemplate {
            name: "Checkout Conversion Rate",
            formula: "Completed orders / Checkout sessions x 100",
            target: "+10% within 2 quarters",
            frequency: "Weekly",
        },
        KpiTemplate {
            name: "Average Order Value",
            formula: "Gross merchandise value / Orders",
            target: "+8% within 2 quarters",
            frequency: "Monthly",
        },
        KpiTemplate {
            name: "Cart Abandonment Rate",
            formula: "Abandoned carts / Carts created x 100",
            target: "<= 60%",
            frequency: "Weekly",
        },
    ],
    risks: &[
        RiskTemplate {
            title: "Peak traffic degradation",
            description: "Sale events overload checkout and inventory services.",
            likelihood: Level::Medium,
            impact: Level::High,
            mitigation: "Load-test to 3x forecast peak and enable autoscaling.",
            contingency: "Activate a virtual waiting room and degrade non-essential features.",
        },
        RiskTemplate {
            title: "Inventory synchronization lag",
            description: "Stock levels drift between storefront and warehouse systems, causing oversells.",
            likelihood: Level::Medium,
            impact: Level::Medium,
            mitigation: "Use event-driven stock updates with reservation at checkout.",
            contingency: "Hold affected orders and notify customers proactively.",
        },
    ],
    nfrs: &[
        "Performance: product page under 2 s p95; checkout submit under 3 s p95.",
        "Security: PCI DSS scope minimized through tokenized payments.",
        "Scalability: sustain 3x average traffic during promotional events.",
    ],
    data_entities: &["Customer", "Product", "SKU", "Cart", "Order", "Shipment", "Return"],
    interfaces: &[
        "Payment gateway and fraud screening",
        "Warehouse management system for stock and fulfilment",
        "Shipping carrier rate and tracking APIs",
        "Marketing and email service provider",
    ],
    dashboard_metrics: &[
        ("Orders Today", "1,284"),
        ("Conversion Rate", "3.2%"),
        ("Average Order Value", "64.20"),
        ("Low-stock SKUs", "46"),
    ],
    quick_actions: &["Add Product", "View Orders", "Process Return", "Create Coupon"],
};

// ---------------------------------------------------------------------------
// CRM & marketing
// ---------------------------------------------------------------------------

const CRM: DomainProfile = DomainProfile {
    id: DomainId::Crm,
    keywords: &[
        ("crm", 5),
        ("sales pipeline", 4),
        ("lead scoring", 4),
        ("email marketing", 4),
        ("contact management", 4),
        ("lead", 3),
        ("campaign", 3),
        ("marketing", 3),
        ("account management", 3),
        ("customer journey", 3),
        ("salesforce", 3),
        ("hubspot", 3),
        ("opt-in", 3),
        ("nurture", 3),
        ("prospect", 2),
        ("opportunity", 2),
        ("opportunities", 2),
        ("segmentation", 2),
        ("newsletter", 2),
        ("conversion", 2),
        ("funnel", 2),
        ("pipeline", 1),
        ("engagement", 1),
    ],
    stakeholders: &[
        "Sales representatives",
        "Sales managers",
        "Marketing managers",
        "Campaign managers",
        "Marketing operations",
        "Data analysts",
    ],
    channels: "web, email, mobile, social media, SMS",
    personas: &["sales representative", "marketing manager", "campaign manager", "sales manager"],
    outcome: "qualified pipeline and lead-to-customer conversion",
    validation_rules: &[
        "Enforce customer consent validation for communication preferences",
        "Validate email address format and deliverability before a contact enters a campaign",
        "Require lead source attribution on every new lead",
        "Enforce duplicate detection on leads and contacts before creation",
        "Enforce unsubscribe requests within 24 hours across all channels",
    ],
    scope: &[
        "Lead capture, scoring and routing",
        "Account and contact management",
        "Opportunity pipeline tracking",
        "Campaign management and attribution",
    ],
    objectives: &[
        "Increase lead-to-opportunity conversion",
        "Shorten the average sales cycle",
        "Improve campaign attribution accuracy",
    ],
    kpis: &[
        KpiTemplate {
            name: "Lead Conversion Rate",
            formula: "Leads converted to opportunities / Qualified leads x 100",
            target: "+15% within 2 quarters",
            frequency: "Monthly",
        },
        KpiTemplate {
            name: "Sales Cycle Length",
            formula: "Median days from opportunity creation to close",
            target: "-20% within 2 quarters",
            frequency: "Monthly",
        },
        KpiTemplate {
            name: "Campaign ROI",
            formula: "(Attributed revenue - Campaign cost) / Campaign cost x 100",
            target: ">= 300%",
            frequency: "Quarterly",
        },
    ],
    risks: &[
        RiskTemplate {
            title: "Consent and privacy non-compliance",
            description: "Marketing sends reach contacts without valid consent under GDPR/CCPA.",
            likelihood: Level::Medium,
            impact: Level::High,
            mitigation: "Centralize consent records and block sends without recorded opt-in.",
            contingency: "Pause affected campaigns and purge non-consented contacts.",
        },
        RiskTemplate {
            title: "Low sales adoption",
            description: "Sales teams keep working in spreadsheets and data quality erodes.",
            likelihood: Level::High,
            impact: Level::Medium,
            mitigation: "Co-design workflows with sales leads and embed CRM usage in pipeline reviews.",
            contingency: "Assign adoption champions and add in-app guidance.",
        },
    ],
    nfrs: &[
        "Performance: segmentation queries under 10 s; campaign launch under 2 minutes.",
        "Deliverability: inbox placement above 95%; unsubscribe processing under 1 hour.",
        "Compliance: GDPR/CCPA consent management, CAN-SPAM, suppression lists.",
    ],
    data_entities: &[
        "Lead",
        "Contact",
        "Account",
        "Opportunity",
        "Campaign",
        "Segment",
        "Activity",
    ],
    interfaces: &[
        "Email and SMS delivery providers",
        "Web forms and landing pages for lead capture",
        "Analytics platform for attribution",
        "Customer data platform",
    ],
    dashboard_metrics: &[
        ("New Leads (7d)", "482"),
        ("Open Opportunities", "131"),
        ("Pipeline Value", "2.4M"),
        ("Campaign Open Rate", "27%"),
    ],
    quick_actions: &["Add Lead", "Create Opportunity", "Launch Campaign", "Log Activity"],
};

// ---------------------------------------------------------------------------
// Education
// ---------------------------------------------------------------------------

const EDUCATION: DomainProfile = DomainProfile {
    id: DomainId::Education,
    keywords: &[
        ("student", 4),
        ("lms", 4),
        ("learning management", 4),
        ("e-learning", 4),
        ("course", 3),
        ("curriculum", 3),
        ("enrollment", 3),
        ("enrolment", 3),
        ("teacher", 3),
        ("instructor", 3),
        ("faculty", 3),
        ("grading", 3),
        ("classroom", 3),
        ("semester", 3),
        ("exam", 3),
        ("examination", 3),
        ("school", 3),
        ("university", 3),
        ("tuition", 3),
        ("syllabus", 3),
        ("grade", 2),
        ("assignment", 2),
        ("admission", 2),
    ],
    stakeholders: &[
        "Students",
        "Teachers and instructors",
        "Academic administrators",
        "Parents and guardians",
        "Registrar office",
        "IT support",
    ],
    channels: "web, mobile, campus portal, email",
    personas: &["student", "instructor", "academic administrator", "registrar"],
    outcome: "student completion and learning outcomes",
    validation_rules: &[
        "Enforce student enrollment verification and prerequisite checks",
        "Validate course scheduling against instructor and room availability",
        "Require grade changes after publication to carry an approver and reason",
        "Enforce role-based access to student records",
    ],
    scope: &[
        "Admissions and enrollment",
        "Course catalogue and scheduling",
        "Assignments, assessments and grading",
        "Student progress reporting",
    ],
    objectives: &[
        "Increase course completion rates",
        "Reduce enrollment processing time",
        "Improve timeliness of grade publication",
    ],
    kpis: &[
        KpiTemplate {
            name: "Course Completion Rate",
            formula: "Students completing / Students enrolled x 100",
            target: "+10% within 2 terms",
            frequency: "Per term",
        },
        KpiTemplate {
            name: "Enrollment Processing Time",
            formula: "Median days from application to confirmed enrollment",
            target: "<= 3 days",
            frequency: "Monthly",
        },
        KpiTemplate {
            name: "On-time Grade Publication",
            formula: "Courses with grades published by deadline / Total courses x 100",
            target: ">= 95%",
            frequency: "Per term",
        },
    ],
    risks: &[
        RiskTemplate {
            title: "Student data privacy breach",
            description: "Student records are exposed to unauthorized users.",
            likelihood: Level::Low,
            impact: Level::High,
            mitigation: "Apply least-privilege roles and audit record access.",
            contingency: "Notify affected students and guardians; rotate credentials.",
        },
        RiskTemplate {
            title: "Term-start load spikes",
            description: "Enrollment windows overload the platform.",
            likelihood: Level::Medium,
            impact: Level::Medium,
            mitigation: "Stagger enrollment windows and load-test before each term.",
            contingency: "Extend enrollment deadlines and enable queueing.",
        },
    ],
    nfrs: &[
        "Availability: 99.9% during enrollment and examination windows.",
        "Accessibility: WCAG 2.1 AA across student-facing pages.",
        "Privacy: role-based access to student records with audit logging.",
    ],
    data_entities: &[
        "Student",
        "Course",
        "Section",
        "Enrollment",
        "Assignment",
        "Grade",
        "Instructor",
    ],
    interfaces: &[
        "Student information system",
        "Learning content providers (LTI)",
        "Payment gateway for tuition",
        "Identity provider for campus single sign-on",
    ],
    dashboard_metrics: &[
        ("Active Students", "8,920"),
        ("Courses This Term", "412"),
        ("Assignments Due (7d)", "1,036"),
        ("Pending Enrollments", "58"),
    ],
    quick_actions: &["Enroll Student", "Create Course", "Post Assignment", "Publish Grades"],
};

// ---------------------------------------------------------------------------
// Logistics
// ---------------------------------------------------------------------------

const LOGISTICS: DomainProfile = DomainProfile {
    id: DomainId::Logistics,
    keywords: &[
        ("shipment", 4),
        ("freight", 4),
        ("supply chain", 4),
        ("logistics", 4),
        ("route optimization", 4),
        ("last mile", 4),
        ("last-mile", 4),
        ("proof of delivery", 4),
        ("bill of lading", 4),
        ("3pl", 4),
        ("warehouse", 3),
        ("fleet", 3),
        ("consignment", 3),
        ("shipping", 2),
        ("carrier", 2),
        ("delivery", 2),
        ("dispatch", 2),
        ("procurement", 2),
        ("purchase order", 2),
        ("inventory", 2),
        ("tracking", 1),
    ],
    stakeholders: &[
        "Shippers",
        "Carriers",
        "Warehouse staff",
        "Drivers and delivery personnel",
        "Supply chain managers",
        "Customers",
    ],
    channels: "web, mobile driver app, tracking portal, EDI",
    personas: &["dispatcher", "warehouse operator", "driver", "shipper"],
    outcome: "on-time delivery and cost per shipment",
    validation_rules: &[
        "Enforce shipment tracking updates at every custody change",
        "Validate carrier capacity before load tendering",
        "Require proof of delivery capture before closing a shipment",
        "Enforce warehouse bin location accuracy on put-away",
    ],
    scope: &[
        "Order intake and shipment planning",
        "Warehouse receiving, put-away and picking",
        "Route planning and dispatch",
        "Shipment tracking and proof of delivery",
    ],
    objectives: &[
        "Increase on-time delivery",
        "Reduce cost per shipment",
        "Improve inventory accuracy",
    ],
    kpis: &[
        KpiTemplate {
            name: "On-time Delivery Rate",
            formula: "Shipments delivered within promised window / Total shipments x 100",
            target: ">= 95%",
            frequency: "Weekly",
        },
        KpiTemplate {
            name: "Cost per Shipment",
            formula: "Total transport cost / Shipments delivered",
            target: "-10% within 2 quarters",
            frequency: "Monthly",
        },
        KpiTemplate {
            name: "Inventory Accuracy",
            formula: "Locations matching system count / Locations counted x 100",
            target: ">= 99%",
            frequency: "Monthly",
        },
    ],
    risks: &[
        RiskTemplate {
            title: "Carrier integration variability",
            description: "Carriers expose tracking data in inconsistent formats and latencies.",
            likelihood: Level::High,
            impact: Level::Medium,
            mitigation: "Normalize carrier events through an integration layer with per-carrier adapters.",
            contingency: "Fall back to manual milestone updates for non-integrated carriers.",
        },
        RiskTemplate {
            title: "Peak season capacity",
            description: "Warehouse and fleet capacity is insufficient during peak season.",
            likelihood: Level::Medium,
            impact: Level::High,
            mitigation: "Forecast peak volumes and pre-book overflow capacity.",
            contingency: "Prioritize by service level and renegotiate delivery windows.",
        },
    ],
    nfrs: &[
        "Performance: tracking events visible within 2 minutes of receipt.",
        "Availability: 99.9% for dispatch and driver app services.",
        "Offline support: driver app captures proof of delivery without connectivity.",
    ],
    data_entities: &[
        "Shipment",
        "Order",
        "Carrier",
        "Route",
        "Warehouse Location",
        "Proof of Delivery",
    ],
    interfaces: &[
        "Carrier APIs and EDI for tendering and tracking",
        "Warehouse management system",
        "Telematics for fleet location",
        "Customer notification service",
    ],
    dashboard_metrics: &[
        ("Shipments In Transit", "2,318"),
        ("On-time Rate (7d)", "93.4%"),
        ("Exceptions Open", "44"),
        ("Dock Appointments Today", "27"),
    ],
    quick_actions: &["Create Shipment", "Plan Route", "Track Shipment", "Record Delivery"],
};

// ---------------------------------------------------------------------------
// Generic
// ---------------------------------------------------------------------------

const GENERIC: DomainProfile = DomainProfile {
    id: DomainId::Generic,
    keywords: &[],
    stakeholders: &[
        "End users",
        "Business users",
        "Operations team",
        "IT support",
        "Management",
    ],
    channels: "web and mobile applications",
    personas: &["business user", "operations manager", "administrator"],
    outcome: "operational efficiency",
    validation_rules: &[
        "Enforce strong authentication and integrity of audit logs",
        "Validate data accuracy and completeness on entry",
        "Require clear error handling and user feedback for rejected input",
        "Enforce role-based access controls on every function",
    ],
    scope: &[
        "Core business workflows and approvals",
        "User and role management",
        "Operational reporting and dashboards",
    ],
    objectives: &[
        "Reduce manual effort in core business processes",
        "Improve data quality and reporting timeliness",
        "Increase user satisfaction with internal tools",
    ],
    kpis: &[
        KpiTemplate {
            name: "Process Cycle Time",
            formula: "Median hours from request to completion",
            target: "-20% within 2 quarters",
            frequency: "Monthly",
        },
        KpiTemplate {
            name: "Data Quality Score",
            formula: "Records passing validation / Total records x 100",
            target: ">= 98%",
            frequency: "Monthly",
        },
        KpiTemplate {
            name: "User Satisfaction (CSAT)",
            formula: "Average post-interaction survey score",
            target: ">= 4.2 / 5",
            frequency: "Quarterly",
        },
    ],
    risks: &[],
    nfrs: &[
        "Security: role-based access control, encryption, secure authentication, audit logging.",
        "Performance: interactive responses under 3 s; 99.5% availability.",
        "Usability: responsive design and accessibility compliance.",
    ],
    data_entities: &["User", "Role", "Request", "Approval", "Audit Event"],
    interfaces: &[
        "Identity provider for single sign-on",
        "Email notification service",
        "Reporting and analytics export",
    ],
    dashboard_metrics: &[
        ("Open Requests", "73"),
        ("Completed This Week", "215"),
        ("Pending Approvals", "19"),
        ("Active Users", "640"),
    ],
    quick_actions: &["New Request", "Approve Items", "View Reports", "Manage Users"],
};
