use axum::http::Method;

use super::role::Role;

/// Verbs reported by [`allowed_methods`], in display order.
const CHECKED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
];

/// Fixed capability table.
///
/// | Role   | GET | POST | PUT/PATCH | DELETE |
/// |--------|-----|------|-----------|--------|
/// | admin  | yes | yes  | yes       | yes    |
/// | editor | yes | yes  | yes       | no     |
/// | viewer | yes | no   | no        | no     |
/// | none   | no  | no   | no        | no     |
///
/// Verbs outside the table are denied for every role.
pub fn is_method_allowed(method: &Method, role: Option<Role>) -> bool {
    let Some(role) = role else {
        return false;
    };

    match *method {
        Method::GET => true,
        Method::POST | Method::PUT | Method::PATCH => matches!(role, Role::Editor | Role::Admin),
        Method::DELETE => role == Role::Admin,
        _ => false,
    }
}

/// String form of [`is_method_allowed`] for callers holding raw values
/// (stored role columns, CLI arguments). Unparseable input is denied.
pub fn is_method_allowed_str(method: &str, role: Option<&str>) -> bool {
    let Ok(method) = Method::from_bytes(method.as_bytes()) else {
        return false;
    };
    let role = role.and_then(|r| r.parse::<Role>().ok());
    is_method_allowed(&method, role)
}

pub fn allowed_methods(role: Role) -> Vec<String> {
    CHECKED_METHODS
        .iter()
        .filter(|method| is_method_allowed(method, Some(role)))
        .map(|method| method.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_may_do_everything() {
        for method in CHECKED_METHODS {
            assert!(is_method_allowed(&method, Some(Role::Admin)), "{method}");
        }
    }

    #[test]
    fn editor_may_not_delete() {
        assert!(is_method_allowed(&Method::GET, Some(Role::Editor)));
        assert!(is_method_allowed(&Method::POST, Some(Role::Editor)));
        assert!(is_method_allowed(&Method::PUT, Some(Role::Editor)));
        assert!(is_method_allowed(&Method::PATCH, Some(Role::Editor)));
        assert!(!is_method_allowed(&Method::DELETE, Some(Role::Editor)));
    }

    #[test]
    fn viewer_may_only_read() {
        assert!(is_method_allowed(&Method::GET, Some(Role::Viewer)));
        assert!(!is_method_allowed(&Method::POST, Some(Role::Viewer)));
        assert!(!is_method_allowed(&Method::PUT, Some(Role::Viewer)));
        assert!(!is_method_allowed(&Method::PATCH, Some(Role::Viewer)));
        assert!(!is_method_allowed(&Method::DELETE, Some(Role::Viewer)));
    }

    #[test]
    fn no_role_is_denied_everything() {
        for method in CHECKED_METHODS {
            assert!(!is_method_allowed(&method, None), "{method}");
        }
    }

    #[test]
    fn verbs_outside_the_table_are_denied() {
        for role in Role::ALL {
            assert!(!is_method_allowed(&Method::OPTIONS, Some(role)));
            assert!(!is_method_allowed(&Method::HEAD, Some(role)));
            assert!(!is_method_allowed(&Method::TRACE, Some(role)));
        }
    }

    #[test]
    fn string_form_fails_closed() {
        assert!(!is_method_allowed_str("DELETE", Some("editor")));
        assert!(is_method_allowed_str("DELETE", Some("admin")));
        assert!(is_method_allowed_str("GET", Some("viewer")));
        assert!(!is_method_allowed_str("GET", None));
        assert!(!is_method_allowed_str("GET", Some("superuser")));
        assert!(!is_method_allowed_str("not a method", Some("admin")));
    }

    #[test]
    fn lists_allowed_methods_per_role() {
        assert_eq!(allowed_methods(Role::Viewer), vec!["GET"]);
        assert_eq!(allowed_methods(Role::Editor), vec!["GET", "POST", "PUT", "PATCH"]);
        assert_eq!(
            allowed_methods(Role::Admin),
            vec!["GET", "POST", "PUT", "PATCH", "DELETE"]
        );
    }
}
