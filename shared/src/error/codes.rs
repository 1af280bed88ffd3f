//! Unified error codes for the Büfé portal
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Access errors
//! - 3xxx: Verification errors
//! - 4xxx: Order errors
//! - 6xxx: Catalog errors
//! - 7xxx: Buffet errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the dashboard scripts can
/// switch on them without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Too many requests
    TooManyRequests = 9,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (e-mail/password)
    InvalidCredentials = 1002,
    /// Session token has expired
    TokenExpired = 1003,
    /// Session token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Access ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Account exists but the e-mail address is not verified yet
    AccountNotActive = 2002,
    /// E-mail domain is not on the allow-list
    InvalidDomain = 2003,
    /// Buffet administrator required
    AdminRequired = 2004,

    // ==================== 3xxx: Verification ====================
    /// Verification token invalid or already used
    VerificationTokenInvalid = 3001,
    /// Verification token expired
    VerificationTokenExpired = 3002,
    /// E-mail address already registered
    EmailAlreadyRegistered = 3003,
    /// Account is already verified
    AlreadyVerified = 3004,
    /// Passwords do not match
    PasswordMismatch = 3005,
    /// Password too short
    PasswordTooShort = 3006,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no items
    OrderEmpty = 4002,
    /// Order can no longer be cancelled
    OrderNotCancellable = 4003,
    /// Scheduled time is too close to now
    ScheduleTooSoon = 4004,
    /// Unknown order status token
    InvalidOrderStatus = 4005,
    /// Unknown break slot
    InvalidBreakSlot = 4006,
    /// Order total does not fit the amount range
    OrderTotalTooLarge = 4007,

    // ==================== 6xxx: Catalog ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product is not available
    ProductUnavailable = 6002,
    /// Quantity exceeds the per-order maximum
    QuantityExceedsLimit = 6003,
    /// Quantity below one
    QuantityTooLow = 6004,
    /// Product has invalid price
    ProductInvalidPrice = 6005,
    /// Category not found
    CategoryNotFound = 6101,

    // ==================== 7xxx: Buffet ====================
    /// No buffet configured
    BuffetNotFound = 7001,
    /// Buffet is exceptionally closed
    BuffetClosed = 7002,
    /// Opening hours entry not found
    OpeningHoursNotFound = 7003,
    /// Time must be formatted as HH:MM
    InvalidTimeFormat = 7004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
    /// E-mail delivery failed
    EmailDeliveryFailed = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::TooManyRequests => "Too many requests, try again later",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid e-mail or password",
            ErrorCode::TokenExpired => "Session has expired",
            ErrorCode::TokenInvalid => "Session token is invalid",

            // Access
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AccountNotActive => "Account is not activated",
            ErrorCode::InvalidDomain => "E-mail domain is not allowed",
            ErrorCode::AdminRequired => "Buffet administrator required",

            // Verification
            ErrorCode::VerificationTokenInvalid => "Verification token is invalid",
            ErrorCode::VerificationTokenExpired => "Verification token has expired",
            ErrorCode::EmailAlreadyRegistered => "E-mail address is already registered",
            ErrorCode::AlreadyVerified => "Account is already verified",
            ErrorCode::PasswordMismatch => "Passwords do not match",
            ErrorCode::PasswordTooShort => "Password is too short",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order has no items",
            ErrorCode::OrderNotCancellable => "Order can no longer be cancelled",
            ErrorCode::ScheduleTooSoon => "Scheduled time must be at least 10 minutes from now",
            ErrorCode::InvalidOrderStatus => "Invalid order status",
            ErrorCode::InvalidBreakSlot => "Unknown break slot",
            ErrorCode::OrderTotalTooLarge => "Order total is too large",

            // Catalog
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductUnavailable => "Product is not available",
            ErrorCode::QuantityExceedsLimit => "Quantity exceeds the per-order maximum",
            ErrorCode::QuantityTooLow => "Quantity must be at least 1",
            ErrorCode::ProductInvalidPrice => "Product price is invalid",
            ErrorCode::CategoryNotFound => "Category not found",

            // Buffet
            ErrorCode::BuffetNotFound => "Buffet not configured",
            ErrorCode::BuffetClosed => "Buffet is exceptionally closed",
            ErrorCode::OpeningHoursNotFound => "Opening hours entry not found",
            ErrorCode::InvalidTimeFormat => "Time must be formatted as HH:MM",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::EmailDeliveryFailed => "E-mail delivery failed",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            9 => Ok(ErrorCode::TooManyRequests),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Access
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::AccountNotActive),
            2003 => Ok(ErrorCode::InvalidDomain),
            2004 => Ok(ErrorCode::AdminRequired),

            // Verification
            3001 => Ok(ErrorCode::VerificationTokenInvalid),
            3002 => Ok(ErrorCode::VerificationTokenExpired),
            3003 => Ok(ErrorCode::EmailAlreadyRegistered),
            3004 => Ok(ErrorCode::AlreadyVerified),
            3005 => Ok(ErrorCode::PasswordMismatch),
            3006 => Ok(ErrorCode::PasswordTooShort),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderEmpty),
            4003 => Ok(ErrorCode::OrderNotCancellable),
            4004 => Ok(ErrorCode::ScheduleTooSoon),
            4005 => Ok(ErrorCode::InvalidOrderStatus),
            4006 => Ok(ErrorCode::InvalidBreakSlot),
            4007 => Ok(ErrorCode::OrderTotalTooLarge),

            // Catalog
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductUnavailable),
            6003 => Ok(ErrorCode::QuantityExceedsLimit),
            6004 => Ok(ErrorCode::QuantityTooLow),
            6005 => Ok(ErrorCode::ProductInvalidPrice),
            6101 => Ok(ErrorCode::CategoryNotFound),

            // Buffet
            7001 => Ok(ErrorCode::BuffetNotFound),
            7002 => Ok(ErrorCode::BuffetClosed),
            7003 => Ok(ErrorCode::OpeningHoursNotFound),
            7004 => Ok(ErrorCode::InvalidTimeFormat),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),
            9004 => Ok(ErrorCode::EmailDeliveryFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
