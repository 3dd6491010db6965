//! # Domain Types
//!
//! Every record kind the store persists. All of them serialize as camelCase
//! JSON; that JSON is both the stored payload and the remote wire shape.
//!
//! ## Tenancy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Company            the tenant itself, no companyId                     │
//! │  User               companyId optional (None = super administrator)     │
//! │  Product, Sale, Client, Supplier, Expense,                              │
//! │  ClientOrder, SupplierOrder, SupplierInvoice                            │
//! │                     companyId required                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Amounts are `i64` in the smallest currency unit; use the `Money`
//! accessors for arithmetic.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::MIN_SECRET_LENGTH;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 1800 bps = 18%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a whole percentage (18 → 1800 bps).
    #[inline]
    pub const fn from_percent(pct: u32) -> Self {
        TaxRate(pct * 100)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Company (tenant root)
// =============================================================================

/// A tenant: one independently configured business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,
    pub logo: Option<String>,
    pub address: String,
    pub phone: String,
    pub email: String,
    /// Tax rate in basis points (1800 = 18%).
    pub tax_rate_bps: u32,
    pub currency_symbol: String,
    /// Printed at the bottom of receipts and invoices.
    pub footer_message: String,
    pub theme_color: Option<String>,
    /// PIN guarding the settings screen.
    pub settings_pin: Option<String>,
}

impl Company {
    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    /// Checks a settings PIN. A company without a PIN rejects every attempt.
    pub fn verify_pin(&self, pin: &str) -> bool {
        self.settings_pin.as_deref() == Some(pin)
    }
}

// =============================================================================
// User
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Manages every company; has no companyId.
    SuperAdmin,
    /// Company manager.
    Admin,
    /// Cashier.
    Sales,
    /// Stock and purchasing.
    InventoryManager,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    /// `None` only for super administrators.
    pub company_id: Option<String>,
    pub name: String,
    pub username: String,
    pub role: UserRole,
    pub avatar: Option<String>,
    /// Stored and compared in plaintext.
    pub password: Option<String>,
}

impl User {
    #[inline]
    pub fn is_super_admin(&self) -> bool {
        self.role == UserRole::SuperAdmin
    }

    /// Plaintext password check.
    ///
    /// Users without a password (absent or empty) accept any password of
    /// at least [`MIN_SECRET_LENGTH`] characters.
    pub fn check_password(&self, password: &str) -> bool {
        match self.password.as_deref() {
            Some(stored) if !stored.is_empty() => stored == password,
            _ => password.chars().count() >= MIN_SECRET_LENGTH,
        }
    }
}

// =============================================================================
// Product
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    General,
    Electronics,
    Fashion,
    Grocery,
    HomeGarden,
    BeautyHealth,
    Services,
    Automotive,
    Construction,
    RealEstate,
}

impl Category {
    /// Label shown on shelves and receipts.
    pub fn label(&self) -> &'static str {
        match self {
            Category::General => "Général / Divers",
            Category::Electronics => "Électronique & High-Tech",
            Category::Fashion => "Mode & Accessoires",
            Category::Grocery => "Alimentation & Boissons",
            Category::HomeGarden => "Maison & Jardin",
            Category::BeautyHealth => "Beauté & Santé",
            Category::Services => "Prestations de Service",
            Category::Automotive => "Automobile & Mécanique",
            Category::Construction => "BTP & Matériaux",
            Category::RealEstate => "Immobilier",
        }
    }
}

/// A product or service a company sells.
///
/// `discount` (whole percent) and `promotional_price` are mutually exclusive
/// overrides; zero means unset for both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub category: Category,
    /// List price.
    pub price: i64,
    /// Unit purchase cost, for margin reporting.
    pub purchase_cost: Option<i64>,
    pub stock: i64,
    #[serde(default)]
    pub description: String,
    pub image: Option<String>,
    /// Percentage discount, 0-100.
    #[serde(default)]
    pub discount: u32,
    #[serde(default)]
    pub promotional_price: i64,
}

impl Product {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_minor(self.price)
    }

    /// Checks that `quantity` units are available.
    pub fn ensure_stock(&self, quantity: i64) -> CoreResult<()> {
        if self.stock < quantity {
            return Err(CoreError::InsufficientStock {
                product: self.name.clone(),
                available: self.stock,
                requested: quantity,
            });
        }
        Ok(())
    }
}

// =============================================================================
// Cart Item (sale / order line snapshot)
// =============================================================================

/// A line of a sale or client order.
///
/// Holds a frozen copy of the product's pricing at the moment the line was
/// added; later product edits never change a recorded sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    pub category: Category,
    /// List price at time of adding (frozen).
    pub unit_price: i64,
    #[serde(default)]
    pub discount: u32,
    #[serde(default)]
    pub promotional_price: i64,
    pub quantity: i64,
}

impl CartItem {
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            category: product.category,
            unit_price: product.price,
            discount: product.discount,
            promotional_price: product.promotional_price,
            quantity,
        }
    }
}

// =============================================================================
// Payment
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    Immediate,
    OrderDeposit,
    DeliveryPayment,
    TermPayment,
    Subscription,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Validated,
    Pending,
    Partial,
    Cancelled,
    Refunded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    MobileMoney,
    BankTransfer,
    Check,
    Card,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MobileMoneyProvider {
    OrangeMoney,
    MtnMoney,
    Wave,
    MoovMoney,
    AirtelMoney,
    Mpesa,
    Other,
}

/// How a sale was paid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
    pub status: PaymentStatus,
    pub method: PaymentMethod,
    /// Set for mobile money payments.
    pub mobile_provider: Option<MobileMoneyProvider>,
    /// Set for checks and bank transfers.
    pub bank_name: Option<String>,
    pub check_number: Option<String>,
}

impl PaymentDetails {
    /// Cash paid in full at the counter.
    pub fn cash() -> Self {
        PaymentDetails {
            payment_type: PaymentType::Immediate,
            status: PaymentStatus::Validated,
            method: PaymentMethod::Cash,
            mobile_provider: None,
            bank_name: None,
            check_number: None,
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A completed checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    pub company_id: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub items: Vec<CartItem>,
    /// Sum of effective line totals before tax.
    #[serde(default)]
    pub subtotal: i64,
    #[serde(default)]
    pub tax: i64,
    pub total: i64,
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    pub payment_info: Option<PaymentDetails>,
}

impl Sale {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_minor(self.total)
    }
}

// =============================================================================
// Client
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientType {
    Individual,
    Corporate,
    Reseller,
    Vip,
}

/// A customer of one company.
///
/// `loyalty_points` and `total_spent` only move through checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    #[serde(rename = "type")]
    pub client_type: ClientType,
    pub loyalty_points: i64,
    pub total_spent: i64,
    pub notes: Option<String>,
}

// =============================================================================
// Supplier
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub supplied_product_ids: Vec<String>,
    #[ts(as = "Option<String>")]
    pub last_order_date: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    pub next_delivery_date: Option<NaiveDate>,
}

// =============================================================================
// Expense
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseCategory {
    Rent,
    Utilities,
    Salaries,
    Marketing,
    Maintenance,
    Taxes,
    Logistics,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub company_id: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub category: ExpenseCategory,
    pub amount: i64,
    pub description: String,
    /// Display name of the user who recorded it.
    pub declared_by: String,
}

// =============================================================================
// Order Status State Machines
// =============================================================================

/// Status of a client order (quote).
///
/// ```text
/// PENDING ──► COMPLETED
///    │
///    └──────► CANCELLED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Completed)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
        )
    }
}

/// Status of a purchase order sent to a supplier.
///
/// ```text
/// PENDING ──► RECEIVED
///    │
///    └──────► CANCELLED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupplierOrderStatus {
    Pending,
    Received,
    Cancelled,
}

impl SupplierOrderStatus {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SupplierOrderStatus::Pending)
    }

    pub fn can_transition_to(&self, next: SupplierOrderStatus) -> bool {
        matches!(
            (self, next),
            (SupplierOrderStatus::Pending, SupplierOrderStatus::Received)
                | (SupplierOrderStatus::Pending, SupplierOrderStatus::Cancelled)
        )
    }
}

// =============================================================================
// Client Order
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ClientOrder {
    pub id: String,
    pub company_id: String,
    pub customer_name: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub items: Vec<CartItem>,
    pub total: i64,
    pub status: OrderStatus,
}

impl ClientOrder {
    /// Moves the order to `next`, rejecting anything but PENDING → terminal.
    pub fn transition(&mut self, next: OrderStatus) -> CoreResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(CoreError::InvalidTransition {
                order_id: self.id.clone(),
                from: format!("{:?}", self.status),
                to: format!("{:?}", next),
            });
        }
        self.status = next;
        Ok(())
    }
}

// =============================================================================
// Supplier Order
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SupplierOrderItem {
    pub product_id: String,
    pub product_name: String,
    pub quantity_ordered: i64,
    pub estimated_unit_cost: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SupplierOrder {
    pub id: String,
    pub company_id: String,
    pub supplier_id: String,
    pub supplier_name: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub expected_delivery_date: Option<NaiveDate>,
    pub items: Vec<SupplierOrderItem>,
    pub total_estimated: i64,
    pub status: SupplierOrderStatus,
}

impl SupplierOrder {
    pub fn transition(&mut self, next: SupplierOrderStatus) -> CoreResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(CoreError::InvalidTransition {
                order_id: self.id.clone(),
                from: format!("{:?}", self.status),
                to: format!("{:?}", next),
            });
        }
        self.status = next;
        Ok(())
    }
}

// =============================================================================
// Supplier Invoice
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SupplierInvoiceItem {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_cost: i64,
}

/// Goods received from a supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SupplierInvoice {
    pub id: String,
    pub company_id: String,
    pub supplier_id: String,
    pub supplier_name: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub items: Vec<SupplierInvoiceItem>,
    /// Σ quantity × unit cost.
    pub total_amount: i64,
    pub related_order_id: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================
