//! # Navigator
//!
//! Owns the current route and runs the guard before every screen.
//!
//! ## Navigation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  go(target)                                                             │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  guard::check(auth, target)                                             │
//! │     ├── Redirect { to: Login, from } ─► remember `from`, show Login     │
//! │     └── Proceed(route)                                                  │
//! │            ├── Logout ─► auth.logout(), show Login                      │
//! │            └── other  ─► subscribe key, unmount old, load screen        │
//! │                                                                         │
//! │  login ok ─► continue to the remembered route (default `/`)             │
//! │  login failed ─► stay on Login with "Login failed"                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The subscription for the new route is taken before the old one is
//! dropped, so re-showing the same key never cancels its request. A `go`
//! future dropped mid-load leaves its subscription in place; the next
//! navigation releases it, which cancels a request still in flight.

use tracing::{debug, info};

use inventory_client::QuerySubscription;
use inventory_core::validation::{LoginForm, ProductForm};
use inventory_core::{guard, NavDecision, ProductId, Route};

use crate::error::{AppError, AppResult};
use crate::screens::create_product::{self, CreateOutcome, CreateProductView};
use crate::screens::layout::{self, LayoutView};
use crate::screens::login::{self, LoginOutcome, LoginView, LOGIN_FAILED};
use crate::screens::{self, Screen};
use crate::state::AppState;

pub struct Navigator {
    state: AppState,
    current: Route,
    screen: Screen,
    return_to: Option<Route>,
    subscription: Option<QuerySubscription>,
}

impl Navigator {
    /// Starts on the login screen without loading anything.
    pub fn new(state: AppState) -> Self {
        Navigator {
            state,
            current: Route::Login,
            screen: Screen::Login(LoginView::default()),
            return_to: None,
            subscription: None,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Route to continue to after the next successful login.
    pub fn return_to(&self) -> Option<&Route> {
        self.return_to.as_ref()
    }

    /// Sidebar and header, absent on the login screen.
    pub fn layout(&self) -> Option<LayoutView> {
        match self.current {
            Route::Login | Route::Logout => None,
            _ => Some(layout::view(&self.state, &self.current)),
        }
    }

    /// Resolves `path`; a product list without `limit` uses the configured
    /// page size.
    pub fn resolve(&self, path: &str) -> AppResult<Route> {
        Ok(Route::parse_with_limit(path, self.state.config.page_limit)?)
    }

    /// Parses `path` and navigates to it.
    pub async fn navigate(&mut self, path: &str) -> AppResult<&Screen> {
        let route = self.resolve(path)?;
        Ok(self.go(route).await)
    }

    /// Navigates to `target`, subject to the guard.
    pub async fn go(&mut self, target: Route) -> &Screen {
        let decision = self.state.auth.with(|auth| guard::check(auth, &target));

        match decision {
            NavDecision::Redirect { to, from } => {
                info!(from = %from, "Not authenticated, redirecting to login");
                if !matches!(from, Route::Logout | Route::Login) {
                    self.return_to = Some(from);
                }
                self.show(to).await
            }
            NavDecision::Proceed(Route::Logout) => {
                login::logout(&self.state);
                self.return_to = None;
                self.show(Route::Login).await
            }
            NavDecision::Proceed(route) => self.show(route).await,
        }
    }

    async fn show(&mut self, route: Route) -> &Screen {
        debug!(route = %route, "Showing screen");
        let subscription = screens::query_key(&route).map(|key| self.state.cache.subscribe(key));
        // Old subscription drops here
        self.subscription = subscription;
        self.current = route;
        // Stays up if the load below is abandoned
        self.screen = screens::peek(&self.state, &self.current);
        self.screen = screens::load(&self.state, &self.current).await;
        &self.screen
    }

    /// Submits the login form.
    pub async fn login(&mut self, form: LoginForm) -> &Screen {
        match login::submit(&self.state, &form).await {
            LoginOutcome::LoggedIn { .. } => {
                let target = self.return_to.take().unwrap_or(Route::Dashboard);
                self.go(target).await
            }
            LoginOutcome::Failed => {
                self.subscription = None;
                self.current = Route::Login;
                self.screen = Screen::Login(LoginView {
                    email: form.email,
                    error: Some(LOGIN_FAILED.to_string()),
                });
                &self.screen
            }
        }
    }

    /// Submits the create-product form.
    ///
    /// Opens the form first if it is not the current screen, which also
    /// applies the guard.
    pub async fn create_product(&mut self, form: ProductForm) -> &Screen {
        if self.current != Route::CreateProduct {
            self.go(Route::CreateProduct).await;
            if self.current != Route::CreateProduct {
                return &self.screen;
            }
        }

        match create_product::submit(&self.state, &form).await {
            CreateOutcome::Created(_) => {
                let list = self.state.config.first_products_page();
                self.go(list).await
            }
            CreateOutcome::Invalid(message) => {
                self.screen = Screen::CreateProduct(CreateProductView::with_error(&form, message));
                &self.screen
            }
            CreateOutcome::Failed => {
                self.screen = Screen::CreateProduct(CreateProductView::with_error(
                    &form,
                    create_product::CREATE_FAILED,
                ));
                &self.screen
            }
        }
    }

    /// Moves to the next list page, if the footer allows it.
    pub async fn next_page(&mut self) -> AppResult<&Screen> {
        let next = self.pagination_target(|p| p.next)?;
        Ok(self.go(Route::Products(next)).await)
    }

    /// Moves to the previous list page, if the footer allows it.
    pub async fn previous_page(&mut self) -> AppResult<&Screen> {
        let previous = self.pagination_target(|p| p.previous)?;
        Ok(self.go(Route::Products(previous)).await)
    }

    fn pagination_target<F>(&self, pick: F) -> AppResult<inventory_core::PageRequest>
    where
        F: FnOnce(&screens::product_list::Pagination) -> Option<inventory_core::PageRequest>,
    {
        let Screen::ProductList(list) = &self.screen else {
            return Err(AppError::bad_command("Not on the product list"));
        };
        list.pagination()
            .and_then(pick)
            .ok_or_else(|| AppError::bad_command("No page in that direction"))
    }

    /// Adds or removes `id` from favorites and redraws the current screen.
    pub async fn toggle_favorite(&mut self, id: ProductId) -> AppResult<&Screen> {
        if !self.state.auth.with(|auth| auth.is_authenticated()) {
            return Err(AppError::bad_command("Log in to mark favorites"));
        }
        self.state.cart.update(|cart| cart.toggle(id));
        if self.current != Route::CreateProduct && self.current != Route::Login {
            self.screen = screens::load(&self.state, &self.current).await;
        }
        Ok(&self.screen)
    }

    /// Discards the current screen's cached data and loads it again.
    pub async fn refresh(&mut self) -> &Screen {
        if let Some(key) = screens::query_key(&self.current) {
            self.state.cache.invalidate(&key);
        }
        let current = self.current.clone();
        self.go(current).await
    }
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("current", &self.current)
            .field("return_to", &self.return_to)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ConfigState;
    use async_trait::async_trait;
    use inventory_client::{ClientError, ClientResult, ProductService};
    use inventory_core::{
        Money, NewProduct, PageMeta, PageRequest, Paginated, Product, ProductListing,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// In-memory service: a growing product list, fixed credentials.
    #[derive(Default)]
    struct FakeService {
        products: Mutex<Vec<Product>>,
        list_calls: AtomicUsize,
        fail_create: bool,
        hang_list: bool,
    }

    fn product(id: u64, title: &str) -> Product {
        Product {
            id: ProductId::from(id),
            title: title.into(),
            price: Money::from_cents(1000 + id as i64),
            category: "tools".into(),
            image: format!("https://img.example.com/{id}.png"),
            description: None,
        }
    }

    #[async_trait]
    impl ProductService for FakeService {
        async fn list_products(&self, page: PageRequest) -> ClientResult<ProductListing> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if self.hang_list {
                std::future::pending::<()>().await;
            }
            let all = self.products.lock().unwrap().clone();
            let limit = page.limit as usize;
            let total_pages = all.len().div_ceil(limit).max(1) as u64;
            let data: Vec<Product> = all
                .into_iter()
                .skip((page.page as usize - 1) * limit)
                .take(limit)
                .collect();
            Ok(ProductListing::Paged(Paginated {
                meta: PageMeta {
                    total_items: self.products.lock().unwrap().len() as u64,
                    item_count: data.len() as u64,
                    items_per_page: limit as u64,
                    total_pages,
                    current_page: page.page as u64,
                },
                data,
            }))
        }

        async fn get_product(&self, id: &ProductId) -> ClientResult<Product> {
            self.products
                .lock()
                .unwrap()
                .iter()
                .find(|p| &p.id == id)
                .cloned()
                .ok_or(ClientError::Status {
                    status: 404,
                    url: format!("/products/{id}"),
                })
        }

        async fn create_product(&self, body: &NewProduct) -> ClientResult<Product> {
            if self.fail_create {
                return Err(ClientError::Status {
                    status: 500,
                    url: "/products".into(),
                });
            }
            let mut products = self.products.lock().unwrap();
            let created = Product {
                id: ProductId::from(products.len() as u64 + 1),
                title: body.title.clone(),
                price: body.price,
                category: body.category.clone(),
                image: body.image_url.clone(),
                description: None,
            };
            products.push(created.clone());
            Ok(created)
        }

        async fn login(&self, email: &str, password: &str) -> ClientResult<()> {
            if email == "ana@example.com" && password == "secret" {
                Ok(())
            } else {
                Err(ClientError::Status {
                    status: 401,
                    url: "/auth/login".into(),
                })
            }
        }
    }

    fn navigator_with(service: FakeService) -> (Navigator, Arc<FakeService>) {
        let service = Arc::new(service);
        let config = ConfigState {
            page_limit: 2,
            ..ConfigState::default()
        };
        let state = AppState::new(service.clone(), config);
        (Navigator::new(state), service)
    }

    fn seeded(n: u64) -> FakeService {
        FakeService {
            products: Mutex::new((1..=n).map(|i| product(i, &format!("Item {i}"))).collect()),
            ..FakeService::default()
        }
    }

    fn good_login() -> LoginForm {
        LoginForm {
            email: "ana@example.com".into(),
            password: "secret".into(),
        }
    }

    #[tokio::test]
    async fn test_guard_redirects_and_login_resumes() {
        let (mut nav, _) = navigator_with(seeded(5));

        nav.navigate("/products/3").await.unwrap();
        assert_eq!(nav.current(), &Route::Login);
        assert_eq!(nav.return_to(), Some(&Route::ProductDetail(ProductId::from(3))));

        nav.login(good_login()).await;
        assert_eq!(nav.current(), &Route::ProductDetail(ProductId::from(3)));
        let Screen::ProductDetail(view) = nav.screen() else {
            panic!("expected detail screen, got {:?}", nav.screen());
        };
        assert_eq!(view.card().unwrap().title, "Item 3");
        assert_eq!(view.card().unwrap().price, "$10.03");
    }

    #[tokio::test]
    async fn test_login_defaults_to_home() {
        let (mut nav, _) = navigator_with(seeded(1));
        nav.login(good_login()).await;
        assert_eq!(nav.current(), &Route::Dashboard);
        assert_eq!(
            nav.layout().unwrap().greeting,
            "Welcome back, ana@example.com"
        );
    }

    #[tokio::test]
    async fn test_failed_login_stays_put() {
        let (mut nav, _) = navigator_with(seeded(1));
        nav.navigate("/products").await.unwrap();

        let screen = nav
            .login(LoginForm {
                email: "ana@example.com".into(),
                password: "wrong".into(),
            })
            .await;
        assert_eq!(
            screen,
            &Screen::Login(LoginView {
                email: "ana@example.com".into(),
                error: Some("Login failed".into()),
            })
        );
        assert_eq!(nav.current(), &Route::Login);
        assert!(!nav.state().auth.with(|a| a.is_authenticated()));
        assert!(nav.return_to().is_some());
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let (mut nav, _) = navigator_with(seeded(1));
        nav.login(good_login()).await;
        nav.navigate("/logout").await.unwrap();

        assert_eq!(nav.current(), &Route::Login);
        assert!(nav.layout().is_none());
        nav.navigate("/").await.unwrap();
        assert_eq!(nav.current(), &Route::Login);
        assert_eq!(nav.return_to(), Some(&Route::Dashboard));
    }

    #[tokio::test]
    async fn test_paging_through_list() {
        let (mut nav, _) = navigator_with(seeded(5));
        nav.login(good_login()).await;
        let first = nav.state().config.first_products_page();
        nav.go(first).await;

        let pagination = |nav: &Navigator| match nav.screen() {
            Screen::ProductList(list) => list.pagination().cloned(),
            _ => None,
        };
        assert_eq!(pagination(&nav).unwrap().label, "Page 1 of 3");
        assert!(nav.previous_page().await.is_err());

        nav.next_page().await.unwrap();
        nav.next_page().await.unwrap();
        let last = pagination(&nav).unwrap();
        assert_eq!(last.label, "Page 3 of 3");
        assert!(!last.next_enabled());
        assert!(nav.next_page().await.is_err());
    }

    #[tokio::test]
    async fn test_favorites_update_badge_and_rows() {
        let (mut nav, _) = navigator_with(seeded(2));
        nav.login(good_login()).await;
        nav.navigate("/products?page=1&limit=2").await.unwrap();

        nav.toggle_favorite(ProductId::from(2)).await.unwrap();
        let Screen::ProductList(list) = nav.screen() else {
            panic!("expected list");
        };
        assert!(!list.rows()[0].favorite);
        assert!(list.rows()[1].favorite);
        assert_eq!(nav.layout().unwrap().cart_badge, "Cart (1)");

        nav.toggle_favorite(ProductId::from(2)).await.unwrap();
        assert_eq!(nav.layout().unwrap().cart_badge, "Cart (0)");
    }

    #[tokio::test]
    async fn test_create_invalidates_list() {
        let (mut nav, service) = navigator_with(seeded(1));
        nav.login(good_login()).await;
        nav.navigate("/products?page=1&limit=2").await.unwrap();
        nav.navigate("/").await.unwrap();
        nav.navigate("/products?page=1&limit=2").await.unwrap();
        assert_eq!(service.list_calls.load(Ordering::SeqCst), 1);

        nav.create_product(ProductForm {
            title: "Wrench".into(),
            price: "9.50".into(),
            category: "tools".into(),
            image_url: "https://img.example.com/w.png".into(),
        })
        .await;

        assert_eq!(nav.current(), &Route::Products(PageRequest::new(1, 2)));
        assert_eq!(service.list_calls.load(Ordering::SeqCst), 2);
        let Screen::ProductList(list) = nav.screen() else {
            panic!("expected list");
        };
        assert!(list.rows().iter().any(|r| r.name == "Wrench"));
    }

    #[tokio::test]
    async fn test_create_failure_keeps_form() {
        let (mut nav, _) = navigator_with(FakeService {
            fail_create: true,
            ..seeded(1)
        });
        nav.login(good_login()).await;

        let form = ProductForm {
            title: "Wrench".into(),
            price: "9.50".into(),
            category: "tools".into(),
            image_url: "https://img.example.com/w.png".into(),
        };
        let screen = nav.create_product(form).await.clone();

        assert_eq!(nav.current(), &Route::CreateProduct);
        let Screen::CreateProduct(view) = screen else {
            panic!("expected form");
        };
        assert_eq!(view.error.as_deref(), Some("Error creating product!"));
        assert_eq!(view.title, "Wrench");
    }

    #[tokio::test]
    async fn test_create_validation_sends_nothing() {
        let (mut nav, service) = navigator_with(seeded(1));
        nav.login(good_login()).await;

        nav.create_product(ProductForm {
            title: "Wrench".into(),
            price: "cheap".into(),
            ..ProductForm::default()
        })
        .await;

        let Screen::CreateProduct(view) = nav.screen() else {
            panic!("expected form");
        };
        assert!(view.error.as_deref().unwrap().starts_with("price"));
        assert_eq!(service.products.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_bare_products_path_uses_configured_page_size() {
        let (mut nav, service) = navigator_with(seeded(5));
        nav.login(good_login()).await;
        nav.navigate("/products").await.unwrap();

        let sidebar = nav.state().config.first_products_page();
        assert_eq!(nav.current(), &sidebar);
        assert_eq!(nav.current(), &Route::Products(PageRequest::new(1, 2)));

        nav.navigate(&sidebar.path()).await.unwrap();
        assert_eq!(service.list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_leaving_a_loading_screen_cancels_its_request() {
        let (mut nav, _) = navigator_with(FakeService {
            hang_list: true,
            ..seeded(3)
        });
        nav.login(good_login()).await;
        let mut events = nav.state().cache.events();
        let page = PageRequest::new(1, 2);
        let key = inventory_client::QueryKey::products(page);

        let abandoned =
            tokio::time::timeout(Duration::from_millis(20), nav.go(Route::Products(page))).await;
        assert!(abandoned.is_err());
        assert_eq!(
            nav.state().cache.status(&key),
            Some(inventory_client::EntryStatus::Pending)
        );
        assert!(matches!(
            nav.screen(),
            Screen::ProductList(crate::screens::product_list::ProductListView::Loading { .. })
        ));

        nav.navigate("/").await.unwrap();
        assert_eq!(nav.state().cache.status(&key), None);
        assert_eq!(nav.state().cache.subscriber_count(&key), 0);

        let mut seen = Vec::new();
        while let Ok(event) = events.try_recv() {
            seen.push(event);
        }
        assert_eq!(
            seen,
            vec![
                inventory_client::CacheEvent::Loading(key.clone()),
                inventory_client::CacheEvent::Cancelled(key),
            ]
        );
    }

    #[tokio::test]
    async fn test_unknown_path_is_an_error() {
        let (mut nav, _) = navigator_with(seeded(1));
        let err = nav.navigate("/settings").await.unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_missing_product_shows_error() {
        let (mut nav, _) = navigator_with(seeded(1));
        nav.login(good_login()).await;
        nav.navigate("/products/42").await.unwrap();

        assert_eq!(
            nav.screen(),
            &Screen::ProductDetail(crate::screens::product_detail::ProductDetailView::Error {
                message: "Error loading product: Network response was not ok".into()
            })
        );
    }
}
