/// Domain sentinel values shared between the filter engine, the mock data
/// generator, and the CLI. The Korean strings mirror what the admin screens
/// actually store, so filters behave identically against real exports.

// Filter sentinel meaning "no restriction" (the UI's "전체" option)
pub const FILTER_ALL: &str = "전체";

// Supplier assumed for records that carry no supplier of their own (in-house)
pub const IN_HOUSE_SUPPLIER: &str = "자사";

// Shipping-policy value meaning the policy was deliberately left unset
pub const SHIPPING_POLICY_UNSPECIFIED: &str = "미지정";

// Listing defaults
pub const DEFAULT_PAGE_SIZE: usize = 20;

// Memo slots the variant edit screen exposes; normalization preserves
// positions but does not enforce the cap
pub const MEMO_SLOTS: usize = 5;
