//! # Built-in Vocabulary Tables
//!
//! ## Purpose
//! Ships the curated phrase inventories the pipeline runs on when the caller
//! does not supply its own: the legal-vocabulary set used for detection and
//! gating, the static legal-definitions table, the common-word list used to
//! filter ordinary English, and the rights phrase sets.
//!
//! All tables are data, not logic; components receive them by injection so
//! tests can substitute minimal vocabularies.

use std::collections::HashMap;

/// Phrases indicating legal/contractual content. Order matters only for
/// display; matching treats this as a set.
pub fn default_legal_terms() -> Vec<String> {
    [
        "terms of service",
        "terms and conditions",
        "user agreement",
        "service agreement",
        "terms of use",
        "legal terms",
        "user terms",
        "usage policy",
        "acceptable use policy",
        "end user license agreement",
        "eula",
        "legal notice",
        "site terms",
        "website terms",
        "service terms",
        "conditions of use",
        "terms",
        "legal agreement",
        "user policy",
        "service conditions",
        "terms & policies",
        "legal information",
        "agreement",
        "rules and regulations",
        "user guidelines",
        "service rules",
        "privacy",
        "tos",
        "disclaimer",
        "liability",
        "warranty",
        "indemnity",
        "confidentiality",
        "non-disclosure agreement",
        "nda",
        "intellectual property",
        "ip rights",
        "license",
        "licensing terms",
        "service level agreement",
        "sla",
        "data protection",
        "cookie policy",
        "gdpr",
        "ccpa",
        "privacy policy",
        "refund policy",
        "return policy",
        "cancellation policy",
        "billing terms",
        "payment terms",
        "subscription terms",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Curated definitions for the most common legal terms. Checked before the
/// bundled corpora and the remote API.
pub fn legal_definitions() -> HashMap<String, String> {
    let entries: &[(&str, &str)] = &[
        // Agreement types
        ("terms of service", "A legal agreement between a service provider and user that governs the use of a service."),
        ("privacy policy", "A document explaining how an organization collects, uses, and protects user data."),
        ("eula", "End User License Agreement - A legal contract between software provider and purchaser."),
        ("sla", "Service Level Agreement - A contract defining the expected level of service between provider and client."),
        ("nda", "Non-Disclosure Agreement - A contract requiring parties to keep specified information confidential."),
        // Legal concepts
        ("liability", "Legal responsibility for one's acts or omissions."),
        ("warranty", "A guarantee or promise about the quality, characteristics, or performance of a product or service."),
        ("indemnity", "An obligation to compensate for a loss or damage incurred."),
        ("jurisdiction", "The legal authority of a court or other institution to make decisions about a matter."),
        ("arbitration", "A method of resolving disputes outside of court through an impartial third party."),
        // Rights and ownership
        ("intellectual property", "Creations of the mind, such as inventions, literary works, designs, and symbols used in commerce."),
        ("copyright", "Legal protection for original works of authorship."),
        ("trademark", "A symbol, word, or words legally registered or established as representing a company or product."),
        ("patent", "A government license conferring exclusive rights to an invention."),
        ("license", "Permission to use something owned or controlled by another party."),
        // Privacy and data
        ("gdpr", "General Data Protection Regulation - EU law on data protection and privacy."),
        ("ccpa", "California Consumer Privacy Act - Law protecting California residents' privacy rights."),
        ("data protection", "Legal measures to ensure secure handling of personal information."),
        ("cookie policy", "Document explaining how a website uses tracking technologies."),
        ("confidentiality", "The obligation to keep certain information private or secret."),
        // Financial terms
        ("billing terms", "Conditions governing payment for services or products."),
        ("refund policy", "Rules regarding the return of money paid for products or services."),
        ("subscription terms", "Conditions governing recurring payment arrangements."),
        ("payment terms", "Conditions under which payments must be made."),
        ("cancellation policy", "Rules regarding the termination of services or agreements."),
        // Usage rights
        ("acceptable use", "Permitted ways of using a service or product."),
        ("user guidelines", "Rules and recommendations for using a service."),
        ("service rules", "Specific regulations governing the use of a service."),
        ("usage policy", "Framework of rules for using a service or product."),
        ("user rights", "Legal entitlements granted to users of a service."),
        // Compliance
        ("compliance", "Adherence to rules, regulations, or standards."),
        ("regulatory", "Relating to or arising from official rules or laws."),
        ("statutory", "Required, permitted, or enacted by statute."),
        ("governing law", "The law that will be used to interpret the agreement."),
        ("enforcement", "The act of compelling observance of or compliance with a law."),
        // Legal actions
        ("litigation", "The process of taking legal action."),
        ("dispute resolution", "Methods for resolving disagreements between parties."),
        ("mediation", "Intervention in a dispute to help reach agreement."),
        ("termination", "The act of ending something, especially a legal agreement."),
        ("breach", "Violation of a law, obligation, or agreement."),
        // Responsibilities
        ("obligation", "A duty to perform certain actions."),
        ("duty", "A legal or moral obligation."),
        ("responsibility", "The state of being accountable for something."),
        ("liability limitation", "Restrictions on legal responsibility for damages."),
        ("force majeure", "Unforeseeable circumstances preventing fulfillment of a contract."),
        // Content rights
        ("user content", "Material created or provided by users of a service."),
        ("proprietary rights", "Rights belonging to the owner of something."),
        ("fair use", "Limited use of copyrighted material without permission for purposes such as commentary, criticism, or parody."),
        ("content license", "Permission to use specific content in defined ways."),
        ("ownership rights", "Legal rights of possession and control."),
    ];

    entries
        .iter()
        .map(|(term, definition)| (term.to_string(), definition.to_string()))
        .collect()
}

/// Ordinary English words filtered out of uncommon-term candidates.
pub fn default_common_words() -> Vec<String> {
    [
        "the", "and", "are", "for", "from", "has", "its", "that", "this", "was",
        "will", "with", "but", "they", "have", "had", "what", "said", "each",
        "which", "she", "how", "their", "out", "many", "then", "them", "these",
        "some", "her", "would", "make", "like", "into", "him", "time", "two",
        "more", "way", "could", "than", "first", "been", "call", "who", "now",
        "find", "down", "day", "did", "get", "come", "made", "may", "part",
        "about", "other", "were", "all", "there", "when", "use", "your", "can",
        "our", "any", "not", "you", "must", "also", "such", "only", "over",
        "after", "before", "between", "under", "upon", "while", "where", "does",
        "shall", "should", "being", "because", "during", "including", "without",
        "through", "provide", "provided", "information", "service", "services",
        "website", "content", "account", "user", "users", "please", "using",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// User-permissive language counted toward a favorable rights score.
pub const POSITIVE_PATTERNS: &[&str] = &[
    "right to",
    "you may",
    "user can",
    "permitted to",
    "allowed to",
    "grant",
    "entitled to",
    "option to",
];

/// Restrictive language counted against the rights score.
pub const NEGATIVE_PATTERNS: &[&str] = &[
    "shall not",
    "may not",
    "prohibited",
    "restricted from",
    "forbidden",
    "waive",
    "forfeit",
    "surrender",
];

/// Duty language counted against the rights score.
pub const OBLIGATION_PATTERNS: &[&str] = &[
    "must",
    "required to",
    "shall",
    "obligated to",
    "responsible for",
    "duty to",
    "agree to",
    "consent to",
];
