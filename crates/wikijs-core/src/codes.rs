//! Wiki.js remote error codes.
//!
//! These numbers are part of the Wiki.js GraphQL contract (`extensions.exception.code`
//! on GraphQL errors, `responseResult.errorCode` on mutation payloads). Keep this table
//! in sync with the platform if it ever renumbers its errors.

use crate::error::ErrorKind;
use std::ops::RangeInclusive;

/// Codes in this range are authentication failures.
pub const AUTH_CODE_RANGE: RangeInclusive<i64> = 1000..=1999;

/// A known remote code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeInfo {
    pub code: i64,
    pub name: &'static str,
    pub kind: ErrorKind,
    /// API-key group permission that resolves a permission failure.
    pub permission: Option<&'static str>,
}

const fn info(
    code: i64,
    name: &'static str,
    kind: ErrorKind,
    permission: Option<&'static str>,
) -> CodeInfo {
    CodeInfo {
        code,
        name,
        kind,
        permission,
    }
}

const KNOWN_CODES: &[CodeInfo] = &[
    // Pages
    info(6001, "PageGenericError", ErrorKind::Generic, None),
    info(6002, "PageDuplicateCreate", ErrorKind::Validation, None),
    info(6003, "PageNotFound", ErrorKind::NotFound, None),
    info(6004, "PageEmptyContent", ErrorKind::Validation, None),
    info(6005, "PageIllegalPath", ErrorKind::Validation, None),
    info(6006, "PagePathCollision", ErrorKind::Validation, None),
    info(6007, "PageMoveForbidden", ErrorKind::Forbidden, Some("manage:pages")),
    info(6008, "PageCreateForbidden", ErrorKind::Forbidden, Some("write:pages")),
    info(6009, "PageUpdateForbidden", ErrorKind::Forbidden, Some("write:pages")),
    info(6010, "PageDeleteForbidden", ErrorKind::Forbidden, Some("delete:pages")),
    info(6011, "PageRestoreForbidden", ErrorKind::Forbidden, Some("manage:pages")),
    info(6012, "PageHistoryForbidden", ErrorKind::Forbidden, Some("read:history")),
    info(
        6013,
        "PageViewForbidden",
        ErrorKind::Forbidden,
        Some("read:pages and read:source"),
    ),
    info(6014, "PageNotYetRendered", ErrorKind::Validation, None),
    // Comments
    info(8001, "CommentGenericError", ErrorKind::Validation, None),
    info(8002, "CommentPostForbidden", ErrorKind::Forbidden, Some("write:comments")),
    info(8003, "CommentNotFound", ErrorKind::NotFound, None),
    info(8004, "CommentViewForbidden", ErrorKind::Forbidden, Some("read:comments")),
    info(8005, "CommentManageForbidden", ErrorKind::Forbidden, Some("manage:comments")),
];

/// Look up a known code.
pub fn lookup(code: i64) -> Option<&'static CodeInfo> {
    KNOWN_CODES.iter().find(|info| info.code == code)
}

/// The kind a numeric remote code maps to. Unknown codes are `Generic`.
pub fn kind_for(code: i64) -> ErrorKind {
    if AUTH_CODE_RANGE.contains(&code) {
        return ErrorKind::Auth;
    }
    lookup(code).map_or(ErrorKind::Generic, |info| info.kind)
}

/// The permission hint for a code, if it is a permission failure.
pub fn permission_for(code: i64) -> Option<&'static str> {
    lookup(code).and_then(|info| info.permission)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_permission_codes_are_forbidden() {
        for code in 6007..=6013 {
            assert_eq!(kind_for(code), ErrorKind::Forbidden, "code {}", code);
            assert!(permission_for(code).is_some(), "code {}", code);
        }
    }

    #[test]
    fn test_auth_range() {
        assert_eq!(kind_for(1000), ErrorKind::Auth);
        assert_eq!(kind_for(1500), ErrorKind::Auth);
        assert_eq!(kind_for(1999), ErrorKind::Auth);
        assert_eq!(kind_for(2000), ErrorKind::Generic);
    }

    #[test]
    fn test_comment_codes() {
        assert_eq!(kind_for(8001), ErrorKind::Validation);
        assert_eq!(kind_for(8002), ErrorKind::Forbidden);
        assert_eq!(kind_for(8003), ErrorKind::NotFound);
        assert_eq!(kind_for(8004), ErrorKind::Forbidden);
        assert_eq!(kind_for(8005), ErrorKind::Forbidden);
        assert_eq!(kind_for(8999), ErrorKind::Generic);
    }

    #[test]
    fn test_view_forbidden_hint_names_both_permissions() {
        let hint = permission_for(6013).unwrap();
        assert!(hint.contains("read:pages"));
        assert!(hint.contains("read:source"));
    }

    #[test]
    fn test_unknown_code() {
        assert!(lookup(4242).is_none());
        assert_eq!(kind_for(4242), ErrorKind::Generic);
    }
}
