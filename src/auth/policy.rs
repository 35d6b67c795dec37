//! Authorization decisions.
//!
//! Every role and ownership rule lives in one pure function so that no
//! endpoint can drift from the others. Handlers resolve the target resource,
//! call [`authorize`], and convert a deny into the matching HTTP error.

use crate::error::AppError;
use crate::models::{PostStatus, Role, StoredComment, StoredPost};

/// The acting identity, as established by the session layer.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: String,
    pub role: Role,
}

/// An action against a specific resource.
#[derive(Debug)]
pub enum Action<'a> {
    ReadPost(&'a StoredPost),
    CreatePost,
    UpdatePost(&'a StoredPost),
    DeletePost(&'a StoredPost),
    CreateComment(&'a StoredPost),
    DeleteComment(&'a StoredComment),
}

/// Outcome of an authorization check.
#[derive(Debug, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

/// Why an action was denied.
#[derive(Debug, PartialEq, Eq)]
pub enum DenyReason {
    /// No valid session where one is required.
    Unauthenticated,
    /// Authenticated, but role or ownership rules disallow the action.
    Forbidden,
    /// The resource exists but must not be revealed to this actor.
    NotFound,
    /// The target is in a state that does not admit the action.
    InvalidState,
}

impl Decision {
    /// Convert into a handler result, with the given message on deny.
    pub fn require(self, message: &str) -> Result<(), AppError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(DenyReason::Unauthenticated) => {
                Err(AppError::Unauthorized(message.to_string()))
            }
            Decision::Deny(DenyReason::Forbidden) => Err(AppError::Forbidden(message.to_string())),
            Decision::Deny(DenyReason::NotFound) => Err(AppError::NotFound(message.to_string())),
            Decision::Deny(DenyReason::InvalidState) => {
                Err(AppError::BadRequest(message.to_string()))
            }
        }
    }
}

fn is_owner_or_admin(actor: &Actor, owner_id: &str) -> bool {
    actor.user_id == owner_id || actor.role == Role::Admin
}

/// Decide whether `actor` may perform `action`.
///
/// Decisions are whole-resource; there is no field-level authorization.
pub fn authorize(actor: Option<&Actor>, action: Action<'_>) -> Decision {
    match action {
        // Published posts are world-readable. Drafts exist only for their
        // author and admins; everyone else gets NotFound, not Forbidden,
        // so the draft's existence is not revealed.
        Action::ReadPost(post) => match post.status {
            PostStatus::Published => Decision::Allow,
            PostStatus::Draft => match actor {
                Some(a) if is_owner_or_admin(a, &post.author_id) => Decision::Allow,
                _ => Decision::Deny(DenyReason::NotFound),
            },
        },

        Action::CreatePost => match actor {
            None => Decision::Deny(DenyReason::Unauthenticated),
            Some(a) if a.role.can_write() => Decision::Allow,
            Some(_) => Decision::Deny(DenyReason::Forbidden),
        },

        Action::UpdatePost(post) | Action::DeletePost(post) => match actor {
            None => Decision::Deny(DenyReason::Unauthenticated),
            Some(a) if is_owner_or_admin(a, &post.author_id) => Decision::Allow,
            Some(_) => Decision::Deny(DenyReason::Forbidden),
        },

        // Any authenticated user may comment, but only on published posts.
        Action::CreateComment(post) => match actor {
            None => Decision::Deny(DenyReason::Unauthenticated),
            Some(_) if post.status != PostStatus::Published => {
                Decision::Deny(DenyReason::InvalidState)
            }
            Some(_) => Decision::Allow,
        },

        Action::DeleteComment(comment) => match actor {
            None => Decision::Deny(DenyReason::Unauthenticated),
            Some(a) if is_owner_or_admin(a, &comment.author_id) => Decision::Allow,
            Some(_) => Decision::Deny(DenyReason::Forbidden),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(user_id: &str, role: Role) -> Actor {
        Actor {
            user_id: user_id.to_string(),
            role,
        }
    }

    fn post(author_id: &str, status: PostStatus) -> StoredPost {
        StoredPost {
            id: "post00000001".to_string(),
            title: "Title".to_string(),
            content: "Content".to_string(),
            tags: vec![],
            status,
            author_id: author_id.to_string(),
            created_at: 0,
            updated_at: 0,
        }
    }

    fn comment(author_id: &str) -> StoredComment {
        StoredComment {
            id: "comm00000001".to_string(),
            content: "Nice".to_string(),
            author_id: author_id.to_string(),
            post_id: "post00000001".to_string(),
            created_at: 0,
        }
    }

    #[test]
    fn test_published_post_readable_by_anyone() {
        let p = post("writer1", PostStatus::Published);
        assert_eq!(authorize(None, Action::ReadPost(&p)), Decision::Allow);
        assert_eq!(
            authorize(Some(&actor("reader1", Role::Reader)), Action::ReadPost(&p)),
            Decision::Allow
        );
    }

    #[test]
    fn test_draft_hidden_as_not_found() {
        let p = post("writer1", PostStatus::Draft);

        // Anonymous and non-author readers get NotFound, never Forbidden
        assert_eq!(
            authorize(None, Action::ReadPost(&p)),
            Decision::Deny(DenyReason::NotFound)
        );
        assert_eq!(
            authorize(Some(&actor("reader1", Role::Reader)), Action::ReadPost(&p)),
            Decision::Deny(DenyReason::NotFound)
        );
        // A different writer is no better off
        assert_eq!(
            authorize(Some(&actor("writer2", Role::Writer)), Action::ReadPost(&p)),
            Decision::Deny(DenyReason::NotFound)
        );
    }

    #[test]
    fn test_draft_visible_to_author_and_admin() {
        let p = post("writer1", PostStatus::Draft);
        assert_eq!(
            authorize(Some(&actor("writer1", Role::Writer)), Action::ReadPost(&p)),
            Decision::Allow
        );
        assert_eq!(
            authorize(Some(&actor("admin1", Role::Admin)), Action::ReadPost(&p)),
            Decision::Allow
        );
    }

    #[test]
    fn test_create_post_requires_writer() {
        assert_eq!(
            authorize(None, Action::CreatePost),
            Decision::Deny(DenyReason::Unauthenticated)
        );
        assert_eq!(
            authorize(Some(&actor("reader1", Role::Reader)), Action::CreatePost),
            Decision::Deny(DenyReason::Forbidden)
        );
        assert_eq!(
            authorize(Some(&actor("writer1", Role::Writer)), Action::CreatePost),
            Decision::Allow
        );
        assert_eq!(
            authorize(Some(&actor("admin1", Role::Admin)), Action::CreatePost),
            Decision::Allow
        );
    }

    #[test]
    fn test_update_and_delete_post_owner_or_admin() {
        let p = post("writer1", PostStatus::Published);

        assert_eq!(
            authorize(Some(&actor("writer1", Role::Writer)), Action::UpdatePost(&p)),
            Decision::Allow
        );
        assert_eq!(
            authorize(Some(&actor("admin1", Role::Admin)), Action::DeletePost(&p)),
            Decision::Allow
        );
        // Another writer owns nothing here
        assert_eq!(
            authorize(Some(&actor("writer2", Role::Writer)), Action::UpdatePost(&p)),
            Decision::Deny(DenyReason::Forbidden)
        );
        assert_eq!(
            authorize(Some(&actor("reader1", Role::Reader)), Action::DeletePost(&p)),
            Decision::Deny(DenyReason::Forbidden)
        );
    }

    #[test]
    fn test_comment_creation_requires_session_and_published_target() {
        let published = post("writer1", PostStatus::Published);
        let draft = post("writer1", PostStatus::Draft);

        assert_eq!(
            authorize(None, Action::CreateComment(&published)),
            Decision::Deny(DenyReason::Unauthenticated)
        );
        assert_eq!(
            authorize(
                Some(&actor("reader1", Role::Reader)),
                Action::CreateComment(&published)
            ),
            Decision::Allow
        );

        // Drafts reject comments regardless of actor role, even the author's
        for role in [Role::Reader, Role::Writer, Role::Admin] {
            assert_eq!(
                authorize(Some(&actor("writer1", role)), Action::CreateComment(&draft)),
                Decision::Deny(DenyReason::InvalidState)
            );
        }
    }

    #[test]
    fn test_delete_comment_owner_or_admin() {
        let c = comment("reader1");

        assert_eq!(
            authorize(Some(&actor("reader1", Role::Reader)), Action::DeleteComment(&c)),
            Decision::Allow
        );
        assert_eq!(
            authorize(Some(&actor("admin1", Role::Admin)), Action::DeleteComment(&c)),
            Decision::Allow
        );
        assert_eq!(
            authorize(Some(&actor("writer1", Role::Writer)), Action::DeleteComment(&c)),
            Decision::Deny(DenyReason::Forbidden)
        );
    }

    #[test]
    fn test_require_maps_reasons_to_errors() {
        let p = post("writer1", PostStatus::Draft);

        let err = authorize(None, Action::ReadPost(&p))
            .require("Post not found")
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = authorize(Some(&actor("reader1", Role::Reader)), Action::CreatePost)
            .require("Not authorized")
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let err = authorize(
            Some(&actor("reader1", Role::Reader)),
            Action::CreateComment(&p),
        )
        .require("Cannot comment on an unpublished post")
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        assert!(authorize(Some(&actor("writer1", Role::Writer)), Action::ReadPost(&p))
            .require("Post not found")
            .is_ok());
    }
}
