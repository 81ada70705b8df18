//! The typed view of an os-release file.
//!
//! [`OsRelease`] maps the assignments produced by the [parser](crate::parser) onto the fields
//! described in `os-release(5)`, filling in the defaults it mandates.  The
//! `*_URL` fields are grouped into [`Urls`] and anything which isn't part of the standard schema
//! is kept verbatim in [`OsRelease::vendor_extra()`], so no key from the file is ever lost.

use std::{borrow::Cow, collections::BTreeMap, str::FromStr};

use crate::{parser::Assignments, Error};

/// The various `*_URL` fields of an os-release file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Urls {
    home: Option<String>,
    documentation: Option<String>,
    support: Option<String>,
    bug_report: Option<String>,
    privacy_policy: Option<String>,
}

impl Urls {
    fn take(assignments: &mut Assignments) -> Self {
        Self {
            home: assignments.remove("HOME_URL"),
            documentation: assignments.remove("DOCUMENTATION_URL"),
            support: assignments.remove("SUPPORT_URL"),
            bug_report: assignments.remove("BUG_REPORT_URL"),
            privacy_policy: assignments.remove("PRIVACY_POLICY_URL"),
        }
    }

    /// `HOME_URL`
    pub fn home(&self) -> Option<&str> {
        self.home.as_deref()
    }

    /// `DOCUMENTATION_URL`
    pub fn documentation(&self) -> Option<&str> {
        self.documentation.as_deref()
    }

    /// `SUPPORT_URL`
    pub fn support(&self) -> Option<&str> {
        self.support.as_deref()
    }

    /// `BUG_REPORT_URL`
    pub fn bug_report(&self) -> Option<&str> {
        self.bug_report.as_deref()
    }

    /// `PRIVACY_POLICY_URL`
    pub fn privacy_policy(&self) -> Option<&str> {
        self.privacy_policy.as_deref()
    }
}

/// The fields of an os-release file.
///
/// This is constructed once from a complete set of [`Assignments`] and never modified
/// afterwards.  `NAME`, `ID` and `PRETTY_NAME` default to `Linux`, `linux` and `Linux`
/// respectively, as per `os-release(5)`.  All other fields are optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsRelease {
    name: String,
    id: String,
    pretty_name: String,
    id_like: Vec<String>,
    version: Option<String>,
    version_codename: Option<String>,
    version_id: Option<String>,
    ansi_color: Option<String>,
    cpe_name: Option<String>,
    build_id: Option<String>,
    variant: Option<String>,
    variant_id: Option<String>,
    logo: Option<String>,
    urls: Urls,
    vendor_extra: BTreeMap<String, String>,
}

impl OsRelease {
    /// Maps parsed assignments onto the os-release schema.
    ///
    /// This never fails: missing fields get their defaults and unknown ones end up in
    /// [`vendor_extra()`](Self::vendor_extra).
    pub fn from_assignments(mut assignments: Assignments) -> Self {
        let urls = Urls::take(&mut assignments);

        let id_like = assignments
            .remove("ID_LIKE")
            .map(|v| v.split_whitespace().map(String::from).collect())
            .unwrap_or_default();

        let mut take_or = |key: &str, default: &str| {
            assignments
                .remove(key)
                .unwrap_or_else(|| default.to_string())
        };
        let name = take_or("NAME", "Linux");
        let id = take_or("ID", "linux");
        let pretty_name = take_or("PRETTY_NAME", "Linux");

        Self {
            name,
            id,
            pretty_name,
            id_like,
            version: assignments.remove("VERSION"),
            version_codename: assignments.remove("VERSION_CODENAME"),
            version_id: assignments.remove("VERSION_ID"),
            ansi_color: assignments.remove("ANSI_COLOR"),
            cpe_name: assignments.remove("CPE_NAME"),
            build_id: assignments.remove("BUILD_ID"),
            variant: assignments.remove("VARIANT"),
            variant_id: assignments.remove("VARIANT_ID"),
            logo: assignments.remove("LOGO"),
            urls,
            vendor_extra: assignments.into_iter().collect(),
        }
    }

    /// Returns true if `query` is this operating system's [`id()`](Self::id) or one of its
    /// [`id_like()`](Self::id_like) entries.
    pub fn is_like(&self, query: &str) -> bool {
        self.id == query || self.id_like.iter().any(|id| id == query)
    }

    /// `NAME`, defaulting to `Linux`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `ID`, defaulting to `linux`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// `PRETTY_NAME`, defaulting to `Linux`.
    pub fn pretty_name(&self) -> &str {
        &self.pretty_name
    }

    /// `ID_LIKE`, split on whitespace.  Empty if the field is absent.
    pub fn id_like(&self) -> &[String] {
        &self.id_like
    }

    /// `VERSION`
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// `VERSION_CODENAME`
    pub fn version_codename(&self) -> Option<&str> {
        self.version_codename.as_deref()
    }

    /// `VERSION_ID`
    pub fn version_id(&self) -> Option<&str> {
        self.version_id.as_deref()
    }

    /// `ANSI_COLOR`, suitable for use in an `ESC [ ... m` sequence.
    pub fn ansi_color(&self) -> Option<&str> {
        self.ansi_color.as_deref()
    }

    /// `CPE_NAME`
    pub fn cpe_name(&self) -> Option<&str> {
        self.cpe_name.as_deref()
    }

    /// `BUILD_ID`
    pub fn build_id(&self) -> Option<&str> {
        self.build_id.as_deref()
    }

    /// `VARIANT`
    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    /// `VARIANT_ID`
    pub fn variant_id(&self) -> Option<&str> {
        self.variant_id.as_deref()
    }

    /// `LOGO`
    pub fn logo(&self) -> Option<&str> {
        self.logo.as_deref()
    }

    /// The `*_URL` fields.  Always present, even if all of the fields are absent.
    pub fn urls(&self) -> &Urls {
        &self.urls
    }

    /// Vendor-specific fields that aren't part of `os-release(5)`.
    pub fn vendor_extra(&self) -> &BTreeMap<String, String> {
        &self.vendor_extra
    }

    /// Lists every present field as an os-release `(key, value)` pair.
    ///
    /// The standard fields come first, in a fixed order, followed by the vendor-specific ones
    /// sorted by key.  `ID_LIKE` is joined back together with single spaces and omitted when
    /// empty.
    pub fn entries(&self) -> Vec<(&str, Cow<'_, str>)> {
        let mut entries = vec![
            ("NAME", Cow::from(&self.name)),
            ("ID", Cow::from(&self.id)),
            ("PRETTY_NAME", Cow::from(&self.pretty_name)),
        ];
        if !self.id_like.is_empty() {
            entries.push(("ID_LIKE", Cow::from(self.id_like.join(" "))));
        }

        let optional = [
            ("VERSION", self.version()),
            ("VERSION_CODENAME", self.version_codename()),
            ("VERSION_ID", self.version_id()),
            ("ANSI_COLOR", self.ansi_color()),
            ("CPE_NAME", self.cpe_name()),
            ("BUILD_ID", self.build_id()),
            ("VARIANT", self.variant()),
            ("VARIANT_ID", self.variant_id()),
            ("LOGO", self.logo()),
            ("HOME_URL", self.urls.home()),
            ("DOCUMENTATION_URL", self.urls.documentation()),
            ("SUPPORT_URL", self.urls.support()),
            ("BUG_REPORT_URL", self.urls.bug_report()),
            ("PRIVACY_POLICY_URL", self.urls.privacy_policy()),
        ];
        entries.extend(
            optional
                .into_iter()
                .filter_map(|(key, value)| Some((key, Cow::from(value?)))),
        );

        entries.extend(
            self.vendor_extra
                .iter()
                .map(|(key, value)| (key.as_str(), Cow::from(value))),
        );
        entries
    }

    /// Looks up a field by its os-release key, like `PRETTY_NAME` or a vendor-specific key.
    pub fn get(&self, key: &str) -> Option<Cow<'_, str>> {
        self.entries()
            .into_iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }
}

impl Default for OsRelease {
    fn default() -> Self {
        Self::from_assignments(Assignments::new())
    }
}

impl From<Assignments> for OsRelease {
    fn from(assignments: Assignments) -> Self {
        Self::from_assignments(assignments)
    }
}

impl FromStr for OsRelease {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse_string(s)
    }
}

#[cfg(test)]
mod test {
    use similar_asserts::assert_eq;

    use super::*;
    use crate::parser::parse;

    fn osrel(text: &str) -> OsRelease {
        OsRelease::from_assignments(parse(text).unwrap())
    }

    #[test]
    fn test_defaults() {
        let empty = osrel("");
        assert_eq!(empty.name(), "Linux");
        assert_eq!(empty.id(), "linux");
        assert_eq!(empty.pretty_name(), "Linux");
        assert!(empty.id_like().is_empty());
        assert_eq!(empty.version(), None);
        assert_eq!(empty.version_codename(), None);
        assert_eq!(empty.version_id(), None);
        assert_eq!(empty.ansi_color(), None);
        assert_eq!(empty.cpe_name(), None);
        assert_eq!(empty.build_id(), None);
        assert_eq!(empty.variant(), None);
        assert_eq!(empty.variant_id(), None);
        assert_eq!(empty.logo(), None);
        assert_eq!(empty.urls(), &Urls::default());
        assert!(empty.vendor_extra().is_empty());
        assert_eq!(empty, OsRelease::default());
    }

    #[test]
    fn test_all_fields() {
        let all = osrel(
            r#"NAME=1
VERSION=2
ID=3
ID_LIKE="4 5"
PRETTY_NAME=6
ANSI_COLOR="0;34"
VERSION_ID=7
HOME_URL="https://example.com/8"
SUPPORT_URL="https://example.com/9"
BUG_REPORT_URL="https://example.com/a"
PRIVACY_POLICY_URL="https://example.com/b"
VERSION_CODENAME=c
CPE_NAME="cpe:/o:example:d"
DOCUMENTATION_URL="https://example.com/e"
BUILD_ID=f
VARIANT="Server Edition"
VARIANT_ID=server-edition
LOGO=example-logo
"#,
        );

        assert_eq!(all.name(), "1");
        assert_eq!(all.version(), Some("2"));
        assert_eq!(all.id(), "3");
        assert_eq!(all.id_like(), ["4", "5"]);
        assert_eq!(all.pretty_name(), "6");
        assert_eq!(all.ansi_color(), Some("0;34"));
        assert_eq!(all.version_id(), Some("7"));
        assert_eq!(all.version_codename(), Some("c"));
        assert_eq!(all.cpe_name(), Some("cpe:/o:example:d"));
        assert_eq!(all.build_id(), Some("f"));
        assert_eq!(all.variant(), Some("Server Edition"));
        assert_eq!(all.variant_id(), Some("server-edition"));
        assert_eq!(all.logo(), Some("example-logo"));

        let urls = all.urls();
        assert_eq!(urls.home(), Some("https://example.com/8"));
        assert_eq!(urls.support(), Some("https://example.com/9"));
        assert_eq!(urls.bug_report(), Some("https://example.com/a"));
        assert_eq!(urls.privacy_policy(), Some("https://example.com/b"));
        assert_eq!(urls.documentation(), Some("https://example.com/e"));

        assert!(all.vendor_extra().is_empty());
    }

    #[test]
    fn test_vendor_extra() {
        let ubuntu = osrel(
            r#"NAME="Ubuntu"
ID=ubuntu
UBUNTU_CODENAME=jammy
HOME_URL="https://www.ubuntu.com/"
EMPTY=
"#,
        );

        let expected = BTreeMap::from([
            ("EMPTY".to_string(), String::new()),
            ("UBUNTU_CODENAME".to_string(), "jammy".to_string()),
        ]);
        assert_eq!(ubuntu.vendor_extra(), &expected);
        assert_eq!(ubuntu.urls().home(), Some("https://www.ubuntu.com/"));
    }

    #[test]
    fn test_every_key_accounted_for() {
        let text = r#"NAME=Fedora
ID=fedora
PRETTY_NAME="Fedora Linux 40 (Workstation Edition)"
ID_LIKE=""
HOME_URL="https://fedoraproject.org/"
VARIANT_ID=workstation
REDHAT_SUPPORT_PRODUCT="Fedora"
"#;
        let assignments = parse(text).unwrap();
        let keys: Vec<String> = assignments.iter().map(|(k, _)| k.to_string()).collect();
        let osrel = OsRelease::from_assignments(assignments);

        // ID_LIKE is consumed even when it yields nothing
        let mut listed: Vec<&str> = osrel.entries().into_iter().map(|(k, _)| k).collect();
        listed.push("ID_LIKE");
        listed.sort();
        let mut keys: Vec<&str> = keys.iter().map(String::as_str).collect();
        keys.sort();
        assert_eq!(listed, keys);
    }

    #[test]
    fn test_id_like_whitespace() {
        let osrel = osrel("ID_LIKE=\"  rhel \t  fedora  \"");
        assert_eq!(osrel.id_like(), ["rhel", "fedora"]);
        assert_eq!(osrel.get("ID_LIKE").as_deref(), Some("rhel fedora"));
    }

    #[test]
    fn test_is_like() {
        let osrel = osrel(
            r#"ID=centos
               ID_LIKE="rhel fedora""#,
        );

        let cases = [
            ("centos", true),
            ("fedora", true),
            ("rhel", true),
            ("debian", false),
            ("ubuntu", false),
            ("", false),
            ("rhel fedora", false),
        ];
        for (query, expected) in cases {
            assert_eq!(osrel.is_like(query), expected, "{query:?}");
        }

        assert!(OsRelease::default().is_like("linux"));
        assert!(osrel.is_like(osrel.id()));
    }

    #[test]
    fn test_mapping_is_idempotent() {
        let assignments = parse("ID=arch\nBUILD_ID=rolling\nFOO=bar").unwrap();
        assert_eq!(
            OsRelease::from(assignments.clone()),
            OsRelease::from(assignments)
        );
    }

    #[test]
    fn test_get() {
        let osrel = osrel("ID=arch\nLOGO=archlinux-logo\nVENDOR_THING=x");
        assert_eq!(osrel.get("NAME").as_deref(), Some("Linux"));
        assert_eq!(osrel.get("LOGO").as_deref(), Some("archlinux-logo"));
        assert_eq!(osrel.get("VENDOR_THING").as_deref(), Some("x"));
        assert_eq!(osrel.get("VERSION"), None);
        assert_eq!(osrel.get("ID_LIKE"), None);
    }

    #[test]
    fn test_from_str() {
        let osrel: OsRelease = "ID=debian\nVERSION_ID=\"12\"".parse().unwrap();
        assert_eq!(osrel.id(), "debian");
        assert_eq!(osrel.version_id(), Some("12"));

        assert!("ID=a$b".parse::<OsRelease>().is_err());
    }
}
