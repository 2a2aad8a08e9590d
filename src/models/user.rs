/// Reference to the user owning a cart or an order. User profiles themselves
/// live in another service.
#[derive(Clone, Copy, Debug, Display, Default, PartialEq, Eq, PartialOrd, Ord, From, FromStr, Hash, Serialize, Deserialize)]
pub struct UserId(i32);

impl UserId {
    pub fn new(id: i32) -> Self {
        UserId(id)
    }

    pub fn inner(&self) -> i32 {
        self.0
    }
}
