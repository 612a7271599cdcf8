use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PostKind {
    Status,
    Achievement,
}

impl PostKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Achievement => "achievement",
        }
    }

    /// Unknown stored kinds are shown as plain status posts.
    pub fn from_stored(raw: &str) -> Self {
        match raw {
            "achievement" => Self::Achievement,
            _ => Self::Status,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Post {
    pub id: u64,
    pub user_id: Uuid,
    pub kind: PostKind,
    pub content: String,
    pub created_at: u64,
}

/// A post joined with its author's username for feed rendering.
#[derive(Clone, Debug)]
pub struct FeedItem {
    pub post: Post,
    pub author_username: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FriendRequestStatus {
    Pending,
    Accepted,
    Declined,
}

impl FriendRequestStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        }
    }

    pub fn from_stored(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "declined" => Some(Self::Declined),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FriendRequest {
    pub id: u64,
    pub sender_id: Uuid,
    pub sender_username: String,
    pub receiver_id: Uuid,
    pub status: FriendRequestStatus,
    pub created_at: u64,
}
