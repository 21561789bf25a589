
/// Markup for one product card in the default catalog layout
pub(crate) fn card(title: &str, href: &str, price: Option<&str>, discount: Option<&str>) -> String {
    let price = price
        .map(|p| format!(r#"<span class="price-box"><span class="price">{}</span></span>"#, p))
        .unwrap_or_default();
    let discount = discount
        .map(|d| format!(r#"<span class="product-item-discount">{}</span>"#, d))
        .unwrap_or_default();
    format!(
        r#"<div class="product-item-info">
             <strong class="product-item-name"><a class="product-item-link" href="{}">{}</a></strong>
             {}{}
           </div>"#,
        href, title, price, discount
    )
}

/// Wraps cards in a listing page
pub(crate) fn listing_page(cards: &[String]) -> String {
    format!(
        "<html><head><title>PC Games</title></head><body><ol class=\"products\">{}</ol></body></html>",
        cards
            .iter()
            .map(|c| format!("<li class=\"product-item\">{}</li>", c))
            .collect::<String>()
    )
}
