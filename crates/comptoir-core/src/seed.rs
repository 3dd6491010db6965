//! # Canonical Seed Set
//!
//! The records a fresh installation starts with: two companies, a small user
//! roster with one super administrator, and a few products, sales, clients,
//! suppliers and expenses per company.
//!
//! The set is plain data. Writing it (once, atomically) is the store's job.
//! Relative dates are computed from the `now` passed in, so the same `now`
//! always yields the same set.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::types::{
    CartItem, Category, Client, ClientType, Company, Expense, ExpenseCategory, PaymentDetails,
    Product, Sale, Supplier, User, UserRole,
};

/// Every record written on first run, grouped by collection.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedSet {
    pub companies: Vec<Company>,
    pub users: Vec<User>,
    pub products: Vec<Product>,
    pub sales: Vec<Sale>,
    pub clients: Vec<Client>,
    pub suppliers: Vec<Supplier>,
    pub expenses: Vec<Expense>,
}

impl SeedSet {
    /// Total number of records across all collections.
    pub fn record_count(&self) -> usize {
        self.companies.len()
            + self.users.len()
            + self.products.len()
            + self.sales.len()
            + self.clients.len()
            + self.suppliers.len()
            + self.expenses.len()
    }
}

/// Builds the canonical seed set relative to `now`.
pub fn canonical_seed(now: DateTime<Utc>) -> SeedSet {
    let products = products();

    let mut discounted_desktop = CartItem::from_product(&products[0], 1);
    discounted_desktop.discount = 5;
    let dresses = CartItem::from_product(&products[3], 2);

    SeedSet {
        companies: companies(),
        users: users(),
        sales: vec![
            Sale {
                id: "1001".to_string(),
                company_id: "1".to_string(),
                date: now - Duration::days(2),
                items: vec![discounted_desktop],
                subtotal: 427_500,
                tax: 0,
                total: 427_500,
                client_id: Some("1".to_string()),
                client_name: Some("Cabinet Avocats & Associés".to_string()),
                payment_info: Some(PaymentDetails::cash()),
            },
            Sale {
                id: "2001".to_string(),
                company_id: "2".to_string(),
                date: now,
                items: vec![dresses],
                subtotal: 90_000,
                tax: 0,
                total: 90_000,
                client_id: Some("3".to_string()),
                client_name: Some("Mme. Aminata Diallo".to_string()),
                payment_info: Some(PaymentDetails::cash()),
            },
        ],
        products,
        clients: clients(),
        suppliers: suppliers(),
        expenses: vec![
            Expense {
                id: "1".to_string(),
                company_id: "1".to_string(),
                date: (now - Duration::days(15)).date_naive(),
                category: ExpenseCategory::Rent,
                amount: 300_000,
                description: "Loyer Magasin Dakar".to_string(),
                declared_by: "Moussa Diop".to_string(),
            },
            Expense {
                id: "2".to_string(),
                company_id: "2".to_string(),
                date: now.date_naive(),
                category: ExpenseCategory::Marketing,
                amount: 50_000,
                description: "Campagne Facebook Ads".to_string(),
                declared_by: "Sarah Koné".to_string(),
            },
        ],
    }
}

fn companies() -> Vec<Company> {
    vec![
        Company {
            id: "1".to_string(),
            name: "Global Tech Solutions".to_string(),
            logo: None,
            address: "Av. de la République, Dakar".to_string(),
            phone: "+221 33 800 00 00".to_string(),
            email: "contact@globaltech.sn".to_string(),
            tax_rate_bps: 1800,
            currency_symbol: "FCFA".to_string(),
            footer_message: "Le meilleur de la technologie. Garantie 1 an sur tout matériel neuf."
                .to_string(),
            theme_color: Some("blue".to_string()),
            settings_pin: Some("1234".to_string()),
        },
        Company {
            id: "2".to_string(),
            name: "Élégance Boutique".to_string(),
            logo: None,
            address: "Rue des Jardins, Abidjan".to_string(),
            phone: "+225 27 22 00 00".to_string(),
            email: "info@elegance.ci".to_string(),
            tax_rate_bps: 0,
            currency_symbol: "€".to_string(),
            footer_message: "La mode, votre style. Échange possible sous 7 jours.".to_string(),
            theme_color: Some("pink".to_string()),
            settings_pin: Some("0000".to_string()),
        },
    ]
}

fn users() -> Vec<User> {
    let user = |id: &str, company: Option<&str>, name: &str, username: &str, role, password: &str| {
        User {
            id: id.to_string(),
            company_id: company.map(str::to_string),
            name: name.to_string(),
            username: username.to_string(),
            role,
            avatar: None,
            password: Some(password.to_string()),
        }
    };

    vec![
        user("0", None, "Admin Système", "superadmin", UserRole::SuperAdmin, "admin"),
        user("1", Some("1"), "Moussa Diop", "manager_tech", UserRole::Admin, "123"),
        user("2", Some("1"), "Awa Fall", "vente_tech", UserRole::Sales, "123"),
        user("3", Some("2"), "Sarah Koné", "manager_mode", UserRole::Admin, "123"),
        user("4", Some("2"), "Jean Kouassi", "vente_mode", UserRole::Sales, "123"),
    ]
}

fn products() -> Vec<Product> {
    let product = |id: &str,
                   company: &str,
                   name: &str,
                   category: Category,
                   price: i64,
                   cost: Option<i64>,
                   stock: i64,
                   description: &str,
                   discount: u32| Product {
        id: id.to_string(),
        company_id: company.to_string(),
        name: name.to_string(),
        category,
        price,
        purchase_cost: cost,
        stock,
        description: description.to_string(),
        image: None,
        discount,
        promotional_price: 0,
    };

    vec![
        product(
            "1",
            "1",
            "HP EliteDesk 800 G5",
            Category::Electronics,
            450_000,
            Some(350_000),
            12,
            "Intel Core i7, 16GB RAM, 512GB SSD, Win 10 Pro",
            0,
        ),
        product(
            "2",
            "1",
            "MacBook Air M2",
            Category::Electronics,
            950_000,
            Some(800_000),
            5,
            "Puce M2, 8GB RAM, 256GB SSD, Gris Sidéral",
            0,
        ),
        product(
            "3",
            "1",
            "Installation Système & Logiciels",
            Category::Services,
            15_000,
            None,
            999,
            "Formatage, installation Windows/Office, Antivirus",
            0,
        ),
        product(
            "201",
            "2",
            "Robe Soirée Satin",
            Category::Fashion,
            45_000,
            Some(20_000),
            8,
            "Robe longue en satin rouge, Taille M/L",
            0,
        ),
        product(
            "202",
            "2",
            "Escarpins Cuir Noir",
            Category::Fashion,
            35_000,
            Some(15_000),
            12,
            "Talons 10cm, Cuir véritable",
            10,
        ),
        product(
            "203",
            "2",
            "Parfum \"Essence d'Or\"",
            Category::BeautyHealth,
            60_000,
            Some(30_000),
            20,
            "Eau de parfum 100ml",
            0,
        ),
    ]
}

fn clients() -> Vec<Client> {
    vec![
        Client {
            id: "1".to_string(),
            company_id: "1".to_string(),
            name: "Cabinet Avocats & Associés".to_string(),
            email: "contact@avocats.sn".to_string(),
            phone: "+221 33 822 22 22".to_string(),
            address: Some("Plateau, Dakar".to_string()),
            client_type: ClientType::Corporate,
            loyalty_points: 120,
            total_spent: 4_500_000,
            notes: Some("Client VIP.".to_string()),
        },
        Client {
            id: "3".to_string(),
            company_id: "2".to_string(),
            name: "Mme. Aminata Diallo".to_string(),
            email: "aminata@gmail.com".to_string(),
            phone: "+225 07 07 07 07".to_string(),
            address: Some("Cocody, Abidjan".to_string()),
            client_type: ClientType::Individual,
            loyalty_points: 50,
            total_spent: 150_000,
            notes: None,
        },
    ]
}

fn suppliers() -> Vec<Supplier> {
    vec![
        Supplier {
            id: "1".to_string(),
            company_id: "1".to_string(),
            name: "Global Tech Distribution".to_string(),
            contact_name: "Jean Dupont".to_string(),
            email: "j.dupont@globaltech.com".to_string(),
            phone: "+221 77 123 45 67".to_string(),
            address: "Zone Industrielle, Dakar".to_string(),
            supplied_product_ids: vec!["1".to_string(), "2".to_string()],
            last_order_date: NaiveDate::from_ymd_opt(2023, 10, 15),
            next_delivery_date: NaiveDate::from_ymd_opt(2023, 11, 20),
        },
        Supplier {
            id: "2".to_string(),
            company_id: "2".to_string(),
            name: "Fashion Import Paris".to_string(),
            contact_name: "Sophie Martin".to_string(),
            email: "contact@fashion-import.fr".to_string(),
            phone: "+33 6 12 34 56 78".to_string(),
            address: "Paris, France".to_string(),
            supplied_product_ids: vec!["201".to_string(), "202".to_string()],
            last_order_date: NaiveDate::from_ymd_opt(2023, 11, 1),
            next_delivery_date: None,
        },
    ]
}
