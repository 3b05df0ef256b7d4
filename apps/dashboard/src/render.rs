//! Plain-text rendering of screens for the terminal.

use std::fmt::Write;

use crate::screens::create_product::CreateProductView;
use crate::screens::home::HomeView;
use crate::screens::layout::LayoutView;
use crate::screens::login::LoginView;
use crate::screens::product_detail::ProductDetailView;
use crate::screens::product_list::{Pagination, ProductListView, COLUMNS};
use crate::screens::Screen;

const RULE: &str = "────────────────────────────────────────────────────────────";

/// Renders `screen`, wrapped in `layout` when there is one.
pub fn page(layout: Option<&LayoutView>, screen: &Screen) -> String {
    let mut out = String::new();
    if let Some(layout) = layout {
        out.push_str(&header(layout));
    }
    out.push_str(&render(screen));
    out
}

/// Sidebar links and the header line.
pub fn header(layout: &LayoutView) -> String {
    let links: Vec<String> = layout
        .links
        .iter()
        .map(|link| {
            let marker = if link.active { "*" } else { " " };
            format!("{}{} ({})", marker, link.label, link.path)
        })
        .collect();

    format!(
        "{} | {} | {}  [/logout]\n{}\n{}\n",
        layout.brand,
        links.join("  "),
        layout.greeting,
        layout.cart_badge,
        RULE
    )
}

pub fn render(screen: &Screen) -> String {
    match screen {
        Screen::Home(view) => home(view),
        Screen::ProductList(view) => product_list(view),
        Screen::ProductDetail(view) => product_detail(view),
        Screen::CreateProduct(view) => create_product(view),
        Screen::Login(view) => login(view),
    }
}

fn home(view: &HomeView) -> String {
    format!(
        "{}\n{}\nFavorites: {}\n",
        view.heading, view.body, view.favorites
    )
}

fn product_list(view: &ProductListView) -> String {
    let mut out = String::from("Products\n");
    match view {
        ProductListView::Loading { placeholder_rows } => {
            let _ = writeln!(out, "{}", table_row(COLUMNS));
            for _ in 0..*placeholder_rows {
                let _ = writeln!(out, "{}", table_row(["░░░░░░"; 4]));
            }
        }
        ProductListView::Error { message } => {
            let _ = writeln!(out, "{}", message);
        }
        ProductListView::Ready { rows, pagination } => {
            let _ = writeln!(out, "{}", table_row(COLUMNS));
            for row in rows {
                let star = if row.favorite { "★" } else { "☆" };
                let name = format!("{} {}", row.id, row.name);
                let _ = writeln!(
                    out,
                    "{}",
                    table_row([name.as_str(), row.category.as_str(), row.price.as_str(), star])
                );
            }
            out.push_str(&footer(pagination));
        }
    }
    out
}

fn table_row(cells: [&str; 4]) -> String {
    format!(
        "{:<32} {:<16} {:>10} {:^8}",
        cells[0], cells[1], cells[2], cells[3]
    )
}

/// Previous/Next controls; a disabled control is shown in brackets.
pub fn footer(pagination: &Pagination) -> String {
    let control = |label: &str, enabled: bool| {
        if enabled {
            format!("< {} >", label)
        } else {
            format!("[{}]", label)
        }
    };
    format!(
        "{}  {}  {}\n",
        control("Previous", pagination.previous_enabled()),
        pagination.label,
        control("Next", pagination.next_enabled())
    )
}

fn product_detail(view: &ProductDetailView) -> String {
    match view {
        ProductDetailView::Loading => "Loading...\n".to_string(),
        ProductDetailView::Error { message } => format!("{}\n", message),
        ProductDetailView::Ready(card) => {
            let mut out = String::new();
            let star = if card.favorite { "★" } else { "☆" };
            let _ = writeln!(out, "{} {}", card.title, star);
            let _ = writeln!(out, "Category: {}", card.category);
            let _ = writeln!(out, "Price: {}", card.price);
            if let Some(description) = &card.description {
                let _ = writeln!(out, "{}", description);
            }
            let _ = writeln!(out, "Image: {}", card.image);
            out
        }
    }
}

fn create_product(view: &CreateProductView) -> String {
    let mut out = String::from("Create Product\n");
    let _ = writeln!(out, "  title:    {}", view.title);
    let _ = writeln!(out, "  price:    {}", view.price);
    let _ = writeln!(out, "  category: {}", view.category);
    let _ = writeln!(out, "  image:    {}", view.image_url);
    if let Some(error) = &view.error {
        let _ = writeln!(out, "! {}", error);
    }
    out
}

fn login(view: &LoginView) -> String {
    let mut out = String::from("Login\n");
    if !view.email.is_empty() {
        let _ = writeln!(out, "  email: {}", view.email);
    }
    if let Some(error) = &view.error {
        let _ = writeln!(out, "! {}", error);
    }
    out.push_str("  login <email> <password>\n");
    out
}
