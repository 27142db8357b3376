use models::{post::Post, user::User};

/// Whether `user` may edit or delete `post`: its author, or any moderator.
pub fn can_modify(user: &User, post: &Post) -> bool {
    user.id == post.author_id || user.is_moderator()
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::user::Role;

    fn user(id: u64, role: Role) -> User {
        User { id, username: format!("u{id}"), password_hash: String::new(), role }
    }

    #[test]
    fn author_and_moderator_may_modify() {
        let post = Post::new(1, 7, "t".into(), "c".into());
        assert!(can_modify(&user(7, Role::User), &post));
        assert!(can_modify(&user(9, Role::Moderator), &post));
        assert!(!can_modify(&user(9, Role::User), &post));
    }
}
