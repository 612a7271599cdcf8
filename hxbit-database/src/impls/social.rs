use anyhow::Context as _;
use hxbit_core::ValidationError;
use tracing::info;
use uuid::Uuid;

use crate::{
    cache::{PROFILE_CACHE_TTL, follow_counts_key, invalidate_follow_counts},
    database::Database,
    impls::{is_unique_violation, now_i64},
    model::{
        account::FollowCounts,
        social::{FeedItem, FriendRequest, FriendRequestStatus, Post, PostKind},
    },
};

pub const MAX_POST_LEN: usize = 500;

// ---------------------------------------------------------------------------
// Follows
// ---------------------------------------------------------------------------

/// Follow `followee_id`. Returns `false` when the follow already existed.
pub async fn follow(db: &Database, follower_id: Uuid, followee_id: Uuid) -> anyhow::Result<bool> {
    if follower_id == followee_id {
        return Err(ValidationError::SelfReference("follow").into());
    }
    let now = now_i64()?;

    let inserted = sqlx::query(
        "INSERT INTO follows (follower_id, followee_id, created_at) VALUES ($1, $2, $3)
         ON CONFLICT (follower_id, followee_id) DO NOTHING",
    )
    .bind(follower_id)
    .bind(followee_id)
    .bind(now)
    .execute(db.pool())
    .await?
    .rows_affected();

    invalidate_follow_counts(db.cache(), &[follower_id, followee_id]).await;
    Ok(inserted > 0)
}

/// Unfollow `followee_id`. Returns `false` when there was nothing to remove.
pub async fn unfollow(db: &Database, follower_id: Uuid, followee_id: Uuid) -> anyhow::Result<bool> {
    let deleted = sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followee_id = $2")
        .bind(follower_id)
        .bind(followee_id)
        .execute(db.pool())
        .await?
        .rows_affected();

    invalidate_follow_counts(db.cache(), &[follower_id, followee_id]).await;
    Ok(deleted > 0)
}

pub async fn is_following(
    db: &Database,
    follower_id: Uuid,
    followee_id: Uuid,
) -> anyhow::Result<bool> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM follows WHERE follower_id = $1 AND followee_id = $2)",
    )
    .bind(follower_id)
    .bind(followee_id)
    .fetch_one(db.pool())
    .await?;

    Ok(exists)
}

pub async fn follow_counts(db: &Database, user_id: Uuid) -> anyhow::Result<FollowCounts> {
    let cache = db.cache();
    let key = follow_counts_key(cache, user_id);

    cache
        .get_or_load_json(&key, PROFILE_CACHE_TTL, || async {
            let (followers, following): (i64, i64) = sqlx::query_as(
                "SELECT
                    (SELECT COUNT(*) FROM follows WHERE followee_id = $1),
                    (SELECT COUNT(*) FROM follows WHERE follower_id = $1)",
            )
            .bind(user_id)
            .fetch_one(db.pool())
            .await?;

            Ok(FollowCounts {
                followers: u64::try_from(followers).context("followers out of u64 range")?,
                following: u64::try_from(following).context("following out of u64 range")?,
            })
        })
        .await
}

// ---------------------------------------------------------------------------
// Friend requests
// ---------------------------------------------------------------------------

#[derive(sqlx::FromRow)]
struct FriendRequestRow {
    id: i64,
    sender_id: Uuid,
    sender_username: String,
    receiver_id: Uuid,
    status: String,
    created_at: i64,
}

/// Send a friend request. Returns `None` when one is already pending between the pair.
pub async fn send_friend_request(
    db: &Database,
    sender_id: Uuid,
    receiver_id: Uuid,
) -> anyhow::Result<Option<u64>> {
    if sender_id == receiver_id {
        return Err(ValidationError::SelfReference("befriend").into());
    }
    let now = now_i64()?;

    let inserted: Result<i64, sqlx::Error> = sqlx::query_scalar(
        "INSERT INTO friend_requests (sender_id, receiver_id, status, created_at)
         VALUES ($1, $2, 'pending', $3)
         RETURNING id",
    )
    .bind(sender_id)
    .bind(receiver_id)
    .bind(now)
    .fetch_one(db.pool())
    .await;

    match inserted {
        Ok(id) => Ok(Some(u64::try_from(id).context("id row out of u64 range")?)),
        Err(err) if is_unique_violation(&err) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Accept or decline a pending request addressed to `receiver_id`.
///
/// Accepting makes both users follow each other. Returns `false` when no
/// matching pending request exists.
pub async fn respond_friend_request(
    db: &Database,
    receiver_id: Uuid,
    request_id: u64,
    accept: bool,
) -> anyhow::Result<bool> {
    let request_id_i64 = i64::try_from(request_id).context("request_id out of i64 range")?;
    let status = if accept {
        FriendRequestStatus::Accepted
    } else {
        FriendRequestStatus::Declined
    };
    let now = now_i64()?;

    let mut tx = db.pool().begin().await?;

    let sender_id: Option<Uuid> = sqlx::query_scalar(
        "UPDATE friend_requests
         SET status = $1, responded_at = $2
         WHERE id = $3 AND receiver_id = $4 AND status = 'pending'
         RETURNING sender_id",
    )
    .bind(status.as_str())
    .bind(now)
    .bind(request_id_i64)
    .bind(receiver_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(sender_id) = sender_id else {
        tx.rollback().await?;
        return Ok(false);
    };

    if accept {
        sqlx::query(
            "INSERT INTO follows (follower_id, followee_id, created_at)
             VALUES ($1, $2, $3), ($2, $1, $3)
             ON CONFLICT (follower_id, followee_id) DO NOTHING",
        )
        .bind(sender_id)
        .bind(receiver_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    if accept {
        invalidate_follow_counts(db.cache(), &[sender_id, receiver_id]).await;
    }
    info!(%sender_id, %receiver_id, status = status.as_str(), "friend request answered");

    Ok(true)
}

pub async fn incoming_friend_requests(
    db: &Database,
    receiver_id: Uuid,
) -> anyhow::Result<Vec<FriendRequest>> {
    let rows: Vec<FriendRequestRow> = sqlx::query_as(
        "SELECT fr.id, fr.sender_id, a.username AS sender_username, fr.receiver_id, fr.status, fr.created_at
         FROM friend_requests fr
         JOIN accounts a ON a.user_id = fr.sender_id
         WHERE fr.receiver_id = $1 AND fr.status = 'pending'
         ORDER BY fr.created_at DESC, fr.id DESC",
    )
    .bind(receiver_id)
    .fetch_all(db.pool())
    .await?;

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let status = FriendRequestStatus::from_stored(&row.status)
            .with_context(|| format!("unknown friend request status `{}`", row.status))?;
        out.push(FriendRequest {
            id: u64::try_from(row.id).context("id row out of u64 range")?,
            sender_id: row.sender_id,
            sender_username: row.sender_username,
            receiver_id: row.receiver_id,
            status,
            created_at: u64::try_from(row.created_at).context("created_at row out of u64 range")?,
        });
    }

    Ok(out)
}

// ---------------------------------------------------------------------------
// Posts and feed
// ---------------------------------------------------------------------------

#[derive(sqlx::FromRow)]
struct FeedRow {
    id: i64,
    user_id: Uuid,
    username: String,
    kind: String,
    content: String,
    created_at: i64,
}

pub async fn create_post(
    db: &Database,
    user_id: Uuid,
    kind: PostKind,
    content: &str,
) -> anyhow::Result<Post> {
    let content = content.trim();
    if content.is_empty() {
        return Err(ValidationError::MissingField("Post content").into());
    }
    if content.chars().count() > MAX_POST_LEN {
        return Err(ValidationError::TooLong {
            field: "Post content",
            max: MAX_POST_LEN,
        }
        .into());
    }
    let content = content.to_owned();
    let now = now_i64()?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO posts (user_id, kind, content, created_at) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(user_id)
    .bind(kind.as_str())
    .bind(&content)
    .bind(now)
    .fetch_one(db.pool())
    .await?;

    Ok(Post {
        id: u64::try_from(id).context("id row out of u64 range")?,
        user_id,
        kind,
        content,
        created_at: u64::try_from(now).context("created_at out of u64 range")?,
    })
}

/// Record an achievement on the user's feed.
pub async fn post_achievement(db: &Database, user_id: Uuid, text: &str) -> anyhow::Result<Post> {
    create_post(db, user_id, PostKind::Achievement, text).await
}

/// Own posts plus posts from followed users, newest first.
pub async fn feed(db: &Database, user_id: Uuid, limit: u32) -> anyhow::Result<Vec<FeedItem>> {
    let limit_i64 = i64::from(limit.clamp(1, 200));

    let rows: Vec<FeedRow> = sqlx::query_as(
        "SELECT p.id, p.user_id, a.username, p.kind, p.content, p.created_at
         FROM posts p
         JOIN accounts a ON a.user_id = p.user_id
         WHERE p.user_id = $1
            OR p.user_id IN (SELECT followee_id FROM follows WHERE follower_id = $1)
         ORDER BY p.created_at DESC, p.id DESC
         LIMIT $2",
    )
    .bind(user_id)
    .bind(limit_i64)
    .fetch_all(db.pool())
    .await?;

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        out.push(FeedItem {
            post: Post {
                id: u64::try_from(row.id).context("id row out of u64 range")?,
                user_id: row.user_id,
                kind: PostKind::from_stored(&row.kind),
                content: row.content,
                created_at: u64::try_from(row.created_at)
                    .context("created_at row out of u64 range")?,
            },
            author_username: row.username,
        });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use hxbit_core::ValidationError;
    use uuid::Uuid;

    use super::{MAX_POST_LEN, create_post, follow, send_friend_request};
    use crate::model::social::PostKind;
    use crate::database::Database;

    #[tokio::test]
    async fn users_cannot_follow_or_befriend_themselves() {
        let db = Database::connect_lazy("postgres://hxbit@127.0.0.1:1/unreachable").unwrap();
        let me = Uuid::new_v4();

        let err = follow(&db, me, me).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::SelfReference("follow"))
        );

        let err = send_friend_request(&db, me, me).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::SelfReference("befriend"))
        );
    }

    #[tokio::test]
    async fn overlong_posts_are_rejected_not_cut() {
        let db = Database::connect_lazy("postgres://hxbit@127.0.0.1:1/unreachable").unwrap();
        let content = "a".repeat(MAX_POST_LEN + 1);

        let err = create_post(&db, Uuid::new_v4(), PostKind::Status, &content)
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::TooLong {
                field: "Post content",
                max: MAX_POST_LEN,
            })
        );
        assert_eq!(err.to_string(), "Post content can be at most 500 characters");
    }
}
