//! Syntax patterns used by the CRD field constraints
//!
//! These are referenced from `#[schemars(regex = "...")]` attributes and end up
//! as `pattern` validators in the data source schemas.

/// IPv4 or IPv6 address in CIDR notation (`10.0.0.0/8`, `2001:db8::/32`)
pub const CIDR: &str = concat!(
    r"^(?:",
    r"(?:(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])\.){3}(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])",
    r"/(?:3[0-2]|[12]?[0-9])",
    r"|",
    r"(?:(?:[0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}",
    r"|(?:[0-9a-fA-F]{1,4}:){1,7}:",
    r"|(?:[0-9a-fA-F]{1,4}:){1,6}:[0-9a-fA-F]{1,4}",
    r"|(?:[0-9a-fA-F]{1,4}:){1,5}(?::[0-9a-fA-F]{1,4}){1,2}",
    r"|(?:[0-9a-fA-F]{1,4}:){1,4}(?::[0-9a-fA-F]{1,4}){1,3}",
    r"|(?:[0-9a-fA-F]{1,4}:){1,3}(?::[0-9a-fA-F]{1,4}){1,4}",
    r"|(?:[0-9a-fA-F]{1,4}:){1,2}(?::[0-9a-fA-F]{1,4}){1,5}",
    r"|[0-9a-fA-F]{1,4}:(?::[0-9a-fA-F]{1,4}){1,6}",
    r"|:(?:(?::[0-9a-fA-F]{1,4}){1,7}|:))",
    r"/(?:12[0-8]|1[01][0-9]|[1-9]?[0-9])",
    r")$"
);

/// Dotted IPv4 address
pub const IPV4: &str =
    r"^(?:(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])\.){3}(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])$";

/// RFC 1123 subdomain (object names, CIDR group references)
pub const DNS_SUBDOMAIN: &str = r"^[a-z0-9](?:[-a-z0-9]*[a-z0-9])?(?:\.[a-z0-9](?:[-a-z0-9]*[a-z0-9])?)*$";

/// RFC 1123 label (namespaces)
pub const DNS_LABEL: &str = r"^[a-z0-9](?:[-a-z0-9]*[a-z0-9])?$";

/// Fully qualified name for `matchName`
pub const FQDN_NAME: &str = r"^(?:[-a-zA-Z0-9_]+[.]?)+$";

/// Wildcard name for `matchPattern`; `*` matches within a label
pub const FQDN_PATTERN: &str = r"^(?:[-a-zA-Z0-9_*]+[.]?)+$";

/// Port number (0-65535) or IANA service name
pub const PORT: &str = concat!(
    r"^(?:6553[0-5]|655[0-2][0-9]|65[0-4][0-9]{2}|6[0-4][0-9]{3}|[1-5][0-9]{4}|[0-9]{1,4}",
    r"|(?:[a-zA-Z0-9]-?)*[a-zA-Z](?:-?[a-zA-Z0-9])*)$"
);

/// Kafka topic name
pub const KAFKA_TOPIC: &str = r"^[a-zA-Z0-9._-]*$";
