use derive_more::{Deref, Display, From};
use serde::{Deserialize, Serialize};

// region:    --- Asst

#[derive(Debug, Clone, From, Deref, Display)]
pub struct AsstId(String);

impl From<&AsstId> for AsstId {
	fn from(val: &AsstId) -> Self {
		val.clone()
	}
}

#[derive(Debug, Clone)]
pub struct AsstRef {
	pub name: String,
	pub id: AsstId,
}

impl AsstRef {
	pub fn new(name: impl Into<String>, id: AsstId) -> Self {
		Self {
			name: name.into(),
			id,
		}
	}
}

// endregion: --- Asst

// region:    --- ThreadId

#[derive(Debug, Clone, From, Deref, Display, Serialize, Deserialize)]
pub struct ThreadId(String);

impl From<&str> for ThreadId {
	fn from(val: &str) -> Self {
		ThreadId(val.to_string())
	}
}

// endregion: --- ThreadId

// region:    --- RunId

#[derive(Debug, Clone, From, Deref, Display)]
pub struct RunId(String);

// endregion: --- RunId

// region:    --- Message Page

/// Sort order of a thread message listing, by creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Order {
	Asc,
	#[default]
	Desc,
}

impl Order {
	pub fn as_str(&self) -> &'static str {
		match self {
			Order::Asc => "asc",
			Order::Desc => "desc",
		}
	}
}

/// Paging parameters of a thread message listing.
/// `limit` is always within `1..=100`, the range the API accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessagePage {
	limit: u32,
	order: Order,
}

impl MessagePage {
	pub const MAX_LIMIT: u32 = 100;

	pub fn new(limit: u32, order: Order) -> Self {
		Self {
			limit: limit.clamp(1, Self::MAX_LIMIT),
			order,
		}
	}

	pub fn limit(&self) -> u32 {
		self.limit
	}

	pub fn order(&self) -> Order {
		self.order
	}

	pub fn to_query(&self) -> Vec<(&'static str, String)> {
		vec![
			("limit", self.limit.to_string()),
			("order", self.order.as_str().to_string()),
		]
	}
}

impl Default for MessagePage {
	fn default() -> Self {
		Self::new(Self::MAX_LIMIT, Order::Desc)
	}
}

// endregion: --- Message Page

// region:    --- Tests


// endregion: --- Tests
