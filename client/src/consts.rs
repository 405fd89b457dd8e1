//! Product-level constants shared by pages and components.

/// Role assigned to self-service registrations. The upstream identity
/// service requires a role id on create.
pub const DEFAULT_ROLE_ID: &str = "86e17136-caa3-47a1-b1dc-9c26772104b6";

/// Brand name shown in the header, footer, and page titles.
pub const PRODUCT_NAME: &str = "Lumina";

/// How long a notification stays on screen before auto-dismissal.
pub const NOTIFICATION_TTL_MS: u32 = 4_000;

/// Most notifications shown at once; older ones are dropped first.
pub const MAX_NOTIFICATIONS: usize = 3;
