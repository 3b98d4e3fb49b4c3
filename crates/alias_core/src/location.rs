//! Structured file-system locations and their total order.
//!
//! A [`Location`] is parsed once from its URI or path form into separate
//! components (scheme, authority, device, decoded path segments, query,
//! fragment). Comparison then works field by field and never re-parses
//! strings.
//!
//! The order places every location strictly between its path-ancestors and
//! the *upper bound* of those ancestors: for any path `P` and child `x`,
//! `P < P/x < P⊕NUL`. That property is what lets the alias table find all
//! descendants of a location with a single bounded range scan.
//!
//! # Examples
//!
//! ```
//! use alias_core::Location;
//! use std::cmp::Ordering;
//!
//! let dir: Location = "file:/data/dir".parse().unwrap();
//! let child: Location = "file:/data/dir/zzz".parse().unwrap();
//! let sibling: Location = "file:/data/dir%00".parse().unwrap();
//!
//! assert!(dir < child);
//! assert!(child < sibling);
//! assert_eq!(child.cmp_upper_bound(&dir), Ordering::Less);
//! assert!(dir.is_prefix_of(&child));
//! ```

use crate::error::{AliasError, Result};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Characters escaped when a path segment is written back out.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'%')
    .add(b'/')
    .add(b'\\')
    .add(b':')
    .add(b'?')
    .add(b'#');

/// Scheme given to bare absolute paths and drive paths.
pub const FILE_SCHEME: &str = "file";

/// Canonical physical address of a resource.
///
/// Locations are either *hierarchical* (the normal case) or *opaque*. Opaque
/// locations hold address forms that have no path hierarchy, such as
/// `mailto:someone`, or whose decoded segments are not valid UTF-8. They sort
/// after every hierarchical location and never overlap anything.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Location(Repr);

#[derive(Clone, PartialEq, Eq, Hash)]
enum Repr {
    Hierarchical(Address),
    Opaque(String),
}

#[derive(Clone, PartialEq, Eq, Hash)]
struct Address {
    scheme: String,
    authority: Option<String>,
    device: Option<String>,
    segments: Vec<String>,
    query: Option<String>,
    fragment: Option<String>,
}

impl Address {
    /// Scheme, authority and device: the parts that must match before two
    /// paths can be related at all.
    fn cmp_volume(&self, other: &Address) -> Ordering {
        self.scheme
            .cmp(&other.scheme)
            .then_with(|| self.authority.cmp(&other.authority))
            .then_with(|| self.device.cmp(&other.device))
    }

    fn path_only(&self, segments: Vec<String>) -> Address {
        Address {
            scheme: self.scheme.clone(),
            authority: self.authority.clone(),
            device: self.device.clone(),
            segments,
            query: None,
            fragment: None,
        }
    }

    fn has_suffix_parts(&self) -> bool {
        self.query.is_some() || self.fragment.is_some()
    }
}

impl Ord for Address {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_volume(other)
            .then_with(|| self.segments.cmp(&other.segments))
            .then_with(|| self.query.cmp(&other.query))
            .then_with(|| self.fragment.cmp(&other.fragment))
    }
}

impl PartialOrd for Address {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Location {
    /// Parses a location from a URI or an absolute path.
    ///
    /// Accepted forms:
    /// - `scheme://authority/path?query#fragment`
    /// - `scheme:/path`
    /// - `/absolute/path` (scheme `file`)
    /// - `C:/path` or `C:\path` (scheme `file`, device `C:`)
    ///
    /// Percent-encoded octets are decoded in every form, so `/%41` and
    /// `file:/A` are the same location. Only URI forms detect a device in the
    /// first path segment (`file:/Volume:dir` has device `Volume:` and
    /// segments `["dir"]`); a bare `/a:b` keeps `a:b` as a segment.
    ///
    /// # Errors
    ///
    /// Returns `AliasError::InvalidLocation` for empty or relative input.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AliasError::invalid_location(input, "empty location"));
        }

        if let Some((device, rest)) = split_drive(trimmed) {
            let path = rest.replace('\\', "/");
            let Some((_, segments)) = split_path(&path, true, false) else {
                return Ok(Self(Repr::Opaque(trimmed.to_string())));
            };
            return Ok(Self(Repr::Hierarchical(Address {
                scheme: FILE_SCHEME.to_string(),
                authority: None,
                device: Some(device.to_string()),
                segments,
                query: None,
                fragment: None,
            })));
        }

        if trimmed.starts_with('/') {
            let Some((_, segments)) = split_path(trimmed, true, false) else {
                return Ok(Self(Repr::Opaque(trimmed.to_string())));
            };
            return Ok(Self(Repr::Hierarchical(Address {
                scheme: FILE_SCHEME.to_string(),
                authority: None,
                device: None,
                segments,
                query: None,
                fragment: None,
            })));
        }

        let Some((scheme, rest)) = split_scheme(trimmed) else {
            return Err(AliasError::invalid_location(
                input,
                "relative locations are not supported",
            ));
        };

        Ok(parse_uri(trimmed, scheme, rest))
    }

    /// Returns true for address forms without a path hierarchy.
    pub fn is_opaque(&self) -> bool {
        matches!(self.0, Repr::Opaque(_))
    }

    fn address(&self) -> Option<&Address> {
        match &self.0 {
            Repr::Hierarchical(address) => Some(address),
            Repr::Opaque(_) => None,
        }
    }

    /// URI scheme (lower-cased). `None` for opaque locations.
    pub fn scheme(&self) -> Option<&str> {
        self.address().map(|a| a.scheme.as_str())
    }

    /// Server/authority component, e.g. `host:port`.
    pub fn authority(&self) -> Option<&str> {
        self.address().and_then(|a| a.authority.as_deref())
    }

    /// Device or volume identifier, including its trailing `:`.
    pub fn device(&self) -> Option<&str> {
        self.address().and_then(|a| a.device.as_deref())
    }

    /// Decoded path segments. Empty for opaque locations.
    pub fn segments(&self) -> &[String] {
        self.address().map(|a| a.segments.as_slice()).unwrap_or(&[])
    }

    /// Number of path segments.
    pub fn segment_count(&self) -> usize {
        self.segments().len()
    }

    /// Query component, kept verbatim.
    pub fn query(&self) -> Option<&str> {
        self.address().and_then(|a| a.query.as_deref())
    }

    /// Fragment component, kept verbatim.
    pub fn fragment(&self) -> Option<&str> {
        self.address().and_then(|a| a.fragment.as_deref())
    }

    /// Returns true if both locations are hierarchical and share scheme,
    /// authority and device.
    pub fn same_volume(&self, other: &Location) -> bool {
        match (self.address(), other.address()) {
            (Some(a), Some(b)) => a.cmp_volume(b) == Ordering::Equal,
            _ => false,
        }
    }

    /// Returns true if `self` is `other` or a path-ancestor of it.
    ///
    /// Query and fragment are ignored: `file:/a#x` is a prefix of
    /// `file:/a/b#y`.
    pub fn is_prefix_of(&self, other: &Location) -> bool {
        match (self.address(), other.address()) {
            (Some(a), Some(b)) => {
                a.cmp_volume(b) == Ordering::Equal && b.segments.starts_with(&a.segments)
            }
            _ => false,
        }
    }

    /// Returns true if either location is a prefix of the other.
    pub fn overlaps(&self, other: &Location) -> bool {
        self.is_prefix_of(other) || other.is_prefix_of(self)
    }

    /// Segments of `self` below `ancestor`, if `ancestor` is a prefix of `self`.
    pub fn relative_to(&self, ancestor: &Location) -> Option<&[String]> {
        if ancestor.is_prefix_of(self) {
            Some(&self.segments()[ancestor.segment_count()..])
        } else {
            None
        }
    }

    /// Location of a child named `segment`. Query and fragment are dropped.
    ///
    /// Opaque locations have no children; they are returned unchanged.
    pub fn append(&self, segment: &str) -> Location {
        self.join(&[segment])
    }

    /// Location of the descendant reached through `segments`. Query and
    /// fragment are dropped.
    pub fn join<S: AsRef<str>>(&self, segments: &[S]) -> Location {
        match &self.0 {
            Repr::Hierarchical(address) => {
                let mut path = address.segments.clone();
                path.extend(segments.iter().map(|s| s.as_ref().to_string()));
                Self(Repr::Hierarchical(address.path_only(path)))
            }
            Repr::Opaque(_) => self.clone(),
        }
    }

    /// Location of the parent directory, or `None` at the volume root.
    pub fn parent(&self) -> Option<Location> {
        let count = self.segment_count();
        if self.is_opaque() || count == 0 {
            None
        } else {
            Some(self.truncated(count - 1))
        }
    }

    /// The ancestor made of the first `count` segments, without query or
    /// fragment.
    pub fn truncated(&self, count: usize) -> Location {
        match &self.0 {
            Repr::Hierarchical(address) => {
                let keep = count.min(address.segments.len());
                Self(Repr::Hierarchical(
                    address.path_only(address.segments[..keep].to_vec()),
                ))
            }
            Repr::Opaque(_) => self.clone(),
        }
    }

    /// This location without query and fragment.
    pub fn path_only(&self) -> Location {
        self.truncated(self.segment_count())
    }

    /// Compares `self` with the upper bound of `base`.
    ///
    /// The upper bound is `base` with a NUL byte appended to its last
    /// segment; it is never materialized. `base` itself and every path
    /// descendant of `base` compare `Less`, so `[base, bound(base))` is
    /// exactly the set of locations at or below `base`.
    pub fn cmp_upper_bound(&self, base: &Location) -> Ordering {
        match (&self.0, &base.0) {
            (Repr::Hierarchical(a), Repr::Hierarchical(b)) => {
                let volume = a.cmp_volume(b);
                if volume != Ordering::Equal {
                    return volume;
                }
                let Some((last, init)) = b.segments.split_last() else {
                    // the bound of a volume root lies after the whole volume
                    return Ordering::Less;
                };
                for (index, segment) in init.iter().enumerate() {
                    match a.segments.get(index) {
                        None => return Ordering::Less,
                        Some(own) => match own.cmp(segment) {
                            Ordering::Equal => {}
                            other => return other,
                        },
                    }
                }
                match a.segments.get(init.len()) {
                    None => Ordering::Less,
                    Some(own) => match cmp_with_terminator(own, last) {
                        Ordering::Equal
                            if a.segments.len() > b.segments.len() || a.has_suffix_parts() =>
                        {
                            Ordering::Greater
                        }
                        other => other,
                    },
                }
            }
            (Repr::Hierarchical(_), Repr::Opaque(_)) => Ordering::Less,
            (Repr::Opaque(_), Repr::Hierarchical(_)) => Ordering::Greater,
            (Repr::Opaque(own), Repr::Opaque(raw)) => cmp_with_terminator(own, raw),
        }
    }
}

/// Compares `own` with `base ⊕ NUL` byte-wise.
fn cmp_with_terminator(own: &str, base: &str) -> Ordering {
    own.bytes().cmp(base.bytes().chain(std::iter::once(0u8)))
}

/// Splits `C:/rest` or `C:\rest` (or a bare `C:`) into device and rest.
fn split_drive(input: &str) -> Option<(&str, &str)> {
    let bytes = input.as_bytes();
    let is_drive = bytes.len() >= 2
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes.len() == 2 || bytes[2] == b'/' || bytes[2] == b'\\');
    is_drive.then(|| input.split_at(2))
}

fn split_scheme(input: &str) -> Option<(&str, &str)> {
    let (scheme, rest) = input.split_once(':')?;
    let mut chars = scheme.chars();
    let first = chars.next()?;
    let valid = first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some((scheme, rest))
}

fn parse_uri(raw: &str, scheme: &str, rest: &str) -> Location {
    let (rest, fragment) = match rest.split_once('#') {
        Some((head, fragment)) => (head, Some(fragment.to_string())),
        None => (rest, None),
    };
    let (rest, query) = match rest.split_once('?') {
        Some((head, query)) => (head, Some(query.to_string())),
        None => (rest, None),
    };
    let (authority, path) = match rest.strip_prefix("//") {
        Some(after) => {
            let end = after.find('/').unwrap_or(after.len());
            let authority = &after[..end];
            let authority = (!authority.is_empty()).then(|| authority.to_string());
            (authority, &after[end..])
        }
        None => (None, rest),
    };

    let has_hierarchy = path.starts_with('/') || (authority.is_some() && path.is_empty());
    if !has_hierarchy {
        return Location(Repr::Opaque(raw.to_string()));
    }

    match split_path(path, true, true) {
        Some((device, segments)) => Location(Repr::Hierarchical(Address {
            scheme: scheme.to_ascii_lowercase(),
            authority,
            device,
            segments,
            query,
            fragment,
        })),
        None => Location(Repr::Opaque(raw.to_string())),
    }
}

/// Splits a raw path into an optional device and normalized segments.
///
/// Returns `None` when a decoded segment is not valid UTF-8.
fn split_path(
    path: &str,
    decode: bool,
    detect_device: bool,
) -> Option<(Option<String>, Vec<String>)> {
    let mut device = None;
    let mut segments: Vec<String> = Vec::new();

    for (index, raw) in path.split('/').filter(|s| !s.is_empty()).enumerate() {
        let mut raw = raw;
        if index == 0 && detect_device {
            if let Some(colon) = raw.find(':') {
                device = Some(raw[..=colon].to_string());
                raw = &raw[colon + 1..];
                if raw.is_empty() {
                    continue;
                }
            }
        }

        let segment = if decode {
            percent_decode_str(raw).decode_utf8().ok()?.into_owned()
        } else {
            raw.to_string()
        };

        match segment.as_str() {
            "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    Some((device, segments))
}

impl Ord for Location {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.0, &other.0) {
            (Repr::Hierarchical(a), Repr::Hierarchical(b)) => a.cmp(b),
            (Repr::Hierarchical(_), Repr::Opaque(_)) => Ordering::Less,
            (Repr::Opaque(_), Repr::Hierarchical(_)) => Ordering::Greater,
            (Repr::Opaque(a), Repr::Opaque(b)) => a.as_bytes().cmp(b.as_bytes()),
        }
    }
}

impl PartialOrd for Location {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let address = match &self.0 {
            Repr::Hierarchical(address) => address,
            Repr::Opaque(raw) => return f.write_str(raw),
        };

        write!(f, "{}:", address.scheme)?;
        if let Some(authority) = &address.authority {
            write!(f, "//{}", authority)?;
        }
        if let Some(device) = &address.device {
            write!(f, "/{}", device)?;
        }
        for segment in &address.segments {
            write!(f, "/{}", utf8_percent_encode(segment, SEGMENT))?;
        }
        if address.device.is_none() && address.segments.is_empty() {
            f.write_str("/")?;
        }
        if let Some(query) = &address.query {
            write!(f, "?{}", query)?;
        }
        if let Some(fragment) = &address.fragment {
            write!(f, "#{}", fragment)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Location({})", self)
    }
}

impl FromStr for Location {
    type Err = AliasError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Location {
    type Error = AliasError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Location> for String {
    fn from(location: Location) -> Self {
        location.to_string()
    }
}
