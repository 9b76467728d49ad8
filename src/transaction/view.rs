//! HTML rendering for the list of transactions.

use maud::{Markup, html};
use time::UtcOffset;

use super::{core::TransactionItem, date::format_date};

const CURRENCY_SYMBOL: &str = "₽";

/// Render one transaction with its name, date, amount and a delete button.
///
/// The delete button has the class `transaction__remove` and carries the
/// transaction ID in `data-id`. If the timestamp cannot be parsed it is shown
/// as received.
pub fn transaction_html(item: &TransactionItem, local_offset: UtcOffset) -> Markup {
    let date = format_date(&item.created_at, local_offset).unwrap_or_else(|error| {
        tracing::warn!("Could not format date for transaction {}: {error}", item.id);
        item.created_at.clone()
    });

    html! {
        div class={ "transaction transaction_" (item.kind) " row" }
        {
            div class="col-md-7 transaction__details"
            {
                div class="transaction__icon"
                {
                    span class="fa fa-money fa-2x" {}
                }
                div class="transaction__info"
                {
                    h4 class="transaction__title" { (item.name) }
                    div class="transaction__date" { (date) }
                }
            }
            div class="col-md-3"
            {
                div class="transaction__summ"
                {
                    (item.sum) " "
                    span class="currency" { (CURRENCY_SYMBOL) }
                }
            }
            div class="col-md-2 transaction__controls"
            {
                button class="btn btn-danger transaction__remove" data-id=(item.id)
                {
                    i class="fa fa-trash" {}
                }
            }
        }
    }
}

/// Render every transaction in order. An empty list renders nothing.
pub fn transactions_html(items: &[TransactionItem], local_offset: UtcOffset) -> Markup {
    html! {
        @for item in items {
            (transaction_html(item, local_offset))
        }
    }
}
