//! # Console State Machine
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Console Modes                                        │
//! │                                                                         │
//! │   ┌────────────────────┐   latest product unpriced   ┌───────────────┐ │
//! │   │        Idle        │────────────────────────────►│  PendingNew   │ │
//! │   │  (poller running)  │                             │   Product     │ │
//! │   │                    │◄────────────────────────────│ (poller       │ │
//! │   └─────────┬──────────┘   saved (PUT ok) / cancel   │  paused)      │ │
//! │             │                                        └───────────────┘ │
//! │             │ latest product priced, not yet handled                   │
//! │             ▼                                                           │
//! │        cart.add(product, 1)                                             │
//! │                                                                         │
//! │  A barcode is marked handled the first time it is seen, so a           │
//! │  cancelled form is not reopened by the next poll.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;

use grocer_core::validation::{
    validate_discount, validate_price, validate_product_name, validate_sell_price,
    validate_stock,
};
use grocer_core::{DiscountRate, Money, Product, ProductUpdate};

use super::cart::{Cart, CartError};
use crate::poller::PollerControl;

// =============================================================================
// Pricing Form
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    BuyPrice,
    SellPrice,
    Discount,
    Stock,
    Confirm,
}

/// What the UI should do after feeding a line to the pricing form.
#[derive(Debug, Clone, PartialEq)]
pub enum FormStep {
    /// Ask the next question.
    Prompt(String),
    /// The answer was rejected; ask the same question again.
    Retry { error: String, prompt: String },
    /// Operator confirmed; `PUT` this update for product `id`.
    Submit { id: i64, update: ProductUpdate },
    Cancelled,
}

/// Collects name, prices, discount and stock for a freshly scanned product.
///
/// An empty answer keeps the value shown in brackets, except for the sell
/// price, which must end up greater than zero.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingForm {
    product: Product,
    draft: ProductUpdate,
    field: FormField,
}

impl PricingForm {
    pub fn new(product: Product) -> Self {
        PricingForm {
            draft: ProductUpdate::from(&product),
            product,
            field: FormField::Name,
        }
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn draft(&self) -> &ProductUpdate {
        &self.draft
    }

    pub fn field(&self) -> FormField {
        self.field
    }

    pub fn prompt(&self) -> String {
        match self.field {
            FormField::Name => format!("Name [{}]: ", self.draft.name),
            FormField::BuyPrice => format!("Buy price [{}]: ", self.draft.buy_price),
            FormField::SellPrice if self.draft.sell_price.is_zero() => {
                "Sell price (required): ".to_string()
            }
            FormField::SellPrice => format!("Sell price [{}]: ", self.draft.sell_price),
            FormField::Discount => format!("Discount % [{}]: ", self.draft.discount),
            FormField::Stock => format!("Stock [{}]: ", self.draft.stock),
            FormField::Confirm => format!(
                "Save {} at {} ({} off, stock {})? [Y/n/cancel]: ",
                self.draft.name, self.draft.sell_price, self.draft.discount, self.draft.stock
            ),
        }
    }

    /// Feeds one line of operator input.
    pub fn input(&mut self, line: &str) -> FormStep {
        let answer = line.trim();
        if answer.eq_ignore_ascii_case("cancel") {
            return FormStep::Cancelled;
        }

        if self.field == FormField::Confirm {
            return match answer.to_ascii_lowercase().as_str() {
                "" | "y" | "yes" | "save" => FormStep::Submit {
                    id: self.product.id,
                    update: self.draft.clone(),
                },
                "n" | "no" => {
                    self.field = FormField::Name;
                    FormStep::Prompt(self.prompt())
                }
                _ => FormStep::Retry {
                    error: "Answer y, n or cancel".to_string(),
                    prompt: self.prompt(),
                },
            };
        }

        match self.apply(answer) {
            Ok(()) => {
                self.field = next_field(self.field);
                FormStep::Prompt(self.prompt())
            }
            Err(error) => FormStep::Retry {
                error,
                prompt: self.prompt(),
            },
        }
    }

    fn apply(&mut self, answer: &str) -> Result<(), String> {
        match self.field {
            FormField::Name => {
                if !answer.is_empty() {
                    validate_product_name(answer).map_err(|e| e.to_string())?;
                    self.draft.name = answer.to_string();
                }
            }
            FormField::BuyPrice => {
                if !answer.is_empty() {
                    let price = parse_money(answer)?;
                    validate_price("buy_price", price).map_err(|e| e.to_string())?;
                    self.draft.buy_price = price;
                }
            }
            FormField::SellPrice => {
                let price = if answer.is_empty() {
                    self.draft.sell_price
                } else {
                    parse_money(answer)?
                };
                validate_sell_price(price).map_err(|e| e.to_string())?;
                self.draft.sell_price = price;
            }
            FormField::Discount => {
                if !answer.is_empty() {
                    let discount: DiscountRate = answer
                        .parse()
                        .map_err(|_| format!("'{answer}' is not a percentage"))?;
                    validate_discount(discount).map_err(|e| e.to_string())?;
                    self.draft.discount = discount;
                }
            }
            FormField::Stock => {
                if !answer.is_empty() {
                    let stock: i64 = answer
                        .parse()
                        .map_err(|_| format!("'{answer}' is not a whole number"))?;
                    validate_stock(stock).map_err(|e| e.to_string())?;
                    self.draft.stock = stock;
                }
            }
            FormField::Confirm => {}
        }
        Ok(())
    }

    /// The product as it will look once the update is stored.
    pub fn priced_product(&self) -> Product {
        Product {
            name: self.draft.name.clone(),
            buy_price: self.draft.buy_price,
            sell_price: self.draft.sell_price,
            discount: self.draft.discount,
            stock: self.draft.stock,
            ..self.product.clone()
        }
    }
}

fn next_field(field: FormField) -> FormField {
    match field {
        FormField::Name => FormField::BuyPrice,
        FormField::BuyPrice => FormField::SellPrice,
        FormField::SellPrice => FormField::Discount,
        FormField::Discount => FormField::Stock,
        FormField::Stock | FormField::Confirm => FormField::Confirm,
    }
}

fn parse_money(answer: &str) -> Result<Money, String> {
    answer
        .trim_start_matches('$')
        .parse()
        .map_err(|_| format!("'{answer}' is not a price"))
}

// =============================================================================
// Console State
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Idle,
    PendingNewProduct(PricingForm),
}

/// Result of handing the latest catalog product to the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// Already handled this session, or a form is open.
    Ignored,
    /// One unit was added to the cart.
    Added(String),
    /// The pricing form opened; show this prompt.
    NeedsPricing(String),
    CartRejected(CartError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleState {
    cart: Cart,
    mode: Mode,
    handled: HashSet<String>,
}

impl Default for ConsoleState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleState {
    pub fn new() -> Self {
        ConsoleState {
            cart: Cart::new(),
            mode: Mode::Idle,
            handled: HashSet::new(),
        }
    }

    /// Starts a session with `baseline` treated as already handled, so the
    /// product registered before the console started is not rung up.
    pub fn with_baseline(baseline: Option<&Product>) -> Self {
        let mut state = ConsoleState::new();
        if let Some(product) = baseline {
            state.handled.insert(product.barcode.clone());
        }
        state
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.mode, Mode::Idle)
    }

    pub fn is_handled(&self, barcode: &str) -> bool {
        self.handled.contains(barcode)
    }

    /// The poller runs only while no form is open.
    pub fn polling(&self) -> PollerControl {
        if self.is_idle() {
            PollerControl::Run
        } else {
            PollerControl::Pause
        }
    }

    /// Handles the newest product reported by the poller.
    pub fn on_latest(&mut self, product: Product) -> ScanOutcome {
        if !self.is_idle()
            || self.handled.contains(&product.barcode)
            || self.cart.contains(&product.barcode)
        {
            return ScanOutcome::Ignored;
        }
        self.handled.insert(product.barcode.clone());

        if product.needs_pricing() {
            let form = PricingForm::new(product);
            let prompt = form.prompt();
            self.mode = Mode::PendingNewProduct(form);
            return ScanOutcome::NeedsPricing(prompt);
        }

        match self.cart.add(&product, 1) {
            Ok(()) => ScanOutcome::Added(product.name),
            Err(e) => ScanOutcome::CartRejected(e),
        }
    }

    /// Feeds operator input to the open form. `None` when no form is open.
    pub fn form_input(&mut self, line: &str) -> Option<FormStep> {
        let Mode::PendingNewProduct(form) = &mut self.mode else {
            return None;
        };

        let step = form.input(line);
        if step == FormStep::Cancelled {
            self.mode = Mode::Idle;
        }
        Some(step)
    }

    /// The `PUT` for the open form succeeded: close it and ring up one unit.
    pub fn pricing_saved(&mut self) -> ScanOutcome {
        let Mode::PendingNewProduct(form) = std::mem::replace(&mut self.mode, Mode::Idle) else {
            return ScanOutcome::Ignored;
        };

        let product = form.priced_product();
        match self.cart.add(&product, 1) {
            Ok(()) => ScanOutcome::Added(product.name),
            Err(e) => ScanOutcome::CartRejected(e),
        }
    }

    /// Prompt of the open form, used to re-ask after a failed save.
    pub fn pending_prompt(&self) -> Option<String> {
        match &self.mode {
            Mode::PendingNewProduct(form) => Some(form.prompt()),
            Mode::Idle => None,
        }
    }

    pub fn checkout_succeeded(&mut self) {
        self.cart.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::fixtures::product;

    fn open_form(state: &mut ConsoleState) {
        let outcome = state.on_latest(product("5012345678900", 0, 0));
        assert!(matches!(outcome, ScanOutcome::NeedsPricing(_)));
    }

    #[test]
    fn test_priced_scan_goes_to_cart() {
        let mut state = ConsoleState::new();

        let outcome = state.on_latest(product("5012345678900", 250, 0));

        assert_eq!(outcome, ScanOutcome::Added("Item 5012345678900".to_string()));
        assert_eq!(state.cart().total_quantity(), 1);
        assert!(state.is_handled("5012345678900"));
        assert_eq!(state.polling(), PollerControl::Run);
    }

    #[test]
    fn test_repeated_poll_is_ignored() {
        let mut state = ConsoleState::new();
        let milk = product("5012345678900", 250, 0);

        state.on_latest(milk.clone());
        assert_eq!(state.on_latest(milk), ScanOutcome::Ignored);
        assert_eq!(state.cart().total_quantity(), 1);
    }

    #[test]
    fn test_baseline_is_not_rung_up() {
        let milk = product("5012345678900", 250, 0);
        let mut state = ConsoleState::with_baseline(Some(&milk));

        assert_eq!(state.on_latest(milk), ScanOutcome::Ignored);
        assert!(state.cart().is_empty());
    }

    #[test]
    fn test_unpriced_scan_opens_form_and_pauses_polling() {
        let mut state = ConsoleState::new();
        open_form(&mut state);

        assert!(!state.is_idle());
        assert_eq!(state.polling(), PollerControl::Pause);
        assert!(state.cart().is_empty());

        // Other scans wait until the form is closed
        assert_eq!(
            state.on_latest(product("036000291452", 100, 0)),
            ScanOutcome::Ignored
        );
    }

    #[test]
    fn test_form_walkthrough_and_save() {
        let mut state = ConsoleState::new();
        open_form(&mut state);

        assert!(matches!(state.form_input("Oat Milk"), Some(FormStep::Prompt(_))));
        assert!(matches!(state.form_input(""), Some(FormStep::Prompt(_))));
        assert!(matches!(state.form_input("$2.50"), Some(FormStep::Prompt(_))));
        assert!(matches!(state.form_input("10%"), Some(FormStep::Prompt(_))));
        assert!(matches!(state.form_input("24"), Some(FormStep::Prompt(_))));

        let Some(FormStep::Submit { id, update }) = state.form_input("y") else {
            panic!("expected submit");
        };
        assert_eq!(id, 1);
        assert_eq!(update.name, "Oat Milk");
        assert_eq!(update.buy_price, Money::from_cents(100));
        assert_eq!(update.sell_price, Money::from_cents(250));
        assert_eq!(update.discount, DiscountRate::from_percent(10));
        assert_eq!(update.stock, 24);

        assert_eq!(state.pricing_saved(), ScanOutcome::Added("Oat Milk".to_string()));
        assert!(state.is_idle());
        let line = &state.cart().lines()[0];
        assert_eq!(line.unit_price, Money::from_cents(250));
        assert_eq!(line.quantity, 1);
    }

    #[test]
    fn test_form_requires_positive_sell_price() {
        let mut state = ConsoleState::new();
        open_form(&mut state);
        state.form_input("");
        state.form_input("");

        assert!(matches!(state.form_input(""), Some(FormStep::Retry { .. })));
        assert!(matches!(state.form_input("0"), Some(FormStep::Retry { .. })));
        assert!(matches!(state.form_input("abc"), Some(FormStep::Retry { .. })));
        assert!(matches!(state.form_input("1000000.01"), Some(FormStep::Retry { .. })));
        assert!(matches!(state.form_input("1.25"), Some(FormStep::Prompt(_))));
    }

    #[test]
    fn test_form_rejects_bad_discount_and_stock() {
        let mut state = ConsoleState::new();
        open_form(&mut state);
        state.form_input("");
        state.form_input("");
        state.form_input("3");

        assert!(matches!(state.form_input("150"), Some(FormStep::Retry { .. })));
        state.form_input("5");
        assert!(matches!(state.form_input("-2"), Some(FormStep::Retry { .. })));
        assert!(matches!(state.form_input("many"), Some(FormStep::Retry { .. })));
    }

    #[test]
    fn test_form_cancel_returns_to_idle() {
        let mut state = ConsoleState::new();
        open_form(&mut state);

        assert_eq!(state.form_input("cancel"), Some(FormStep::Cancelled));
        assert!(state.is_idle());
        assert!(state.cart().is_empty());

        // A cancelled product is not offered again
        assert_eq!(
            state.on_latest(product("5012345678900", 0, 0)),
            ScanOutcome::Ignored
        );
    }

    #[test]
    fn test_failed_save_keeps_form_open() {
        let mut state = ConsoleState::new();
        open_form(&mut state);
        state.form_input("");
        state.form_input("");
        state.form_input("2");
        state.form_input("");
        state.form_input("");
        assert!(matches!(state.form_input(""), Some(FormStep::Submit { .. })));

        // The UI keeps the form when the PUT fails and asks again
        let prompt = state.pending_prompt().unwrap();
        assert!(prompt.starts_with("Save "));
        assert!(matches!(state.form_input("y"), Some(FormStep::Submit { .. })));
    }

    #[test]
    fn test_confirm_no_restarts_form() {
        let mut state = ConsoleState::new();
        open_form(&mut state);
        for answer in ["", "", "2", "", ""] {
            state.form_input(answer);
        }

        assert!(matches!(state.form_input("n"), Some(FormStep::Prompt(p)) if p.starts_with("Name")));
        let Mode::PendingNewProduct(form) = state.mode() else {
            panic!("form closed");
        };
        assert_eq!(form.field(), FormField::Name);
        assert_eq!(form.draft().sell_price, Money::from_cents(200));
    }

    #[test]
    fn test_form_input_without_form() {
        let mut state = ConsoleState::new();
        assert_eq!(state.form_input("anything"), None);
        assert_eq!(state.pricing_saved(), ScanOutcome::Ignored);
    }

    #[test]
    fn test_checkout_clears_cart_but_not_handled() {
        let mut state = ConsoleState::new();
        state.on_latest(product("5012345678900", 250, 0));

        state.checkout_succeeded();

        assert!(state.cart().is_empty());
        assert!(state.is_handled("5012345678900"));
    }
}
