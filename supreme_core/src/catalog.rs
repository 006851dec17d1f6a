// Static product catalog and its lookup/filter operations

use crate::models::{Badge, Category, Product};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;

/// One row of the built-in product table. Prices are in centavos.
struct SeedRow {
    id: &'static str,
    name: &'static str,
    price: i64,
    original_price: Option<i64>,
    image: &'static str,
    category: Category,
    brand: &'static str,
    description: &'static str,
    badge: Option<Badge>,
    rating: f32,
    reviews: u32,
}

const SEED_ROWS: [SeedRow; 16] = [
    SeedRow {
        id: "whey-1",
        name: "Whey Protein Growth 100%",
        price: 10199,
        original_price: Some(11999),
        image: "assets/img/wheys/whey_protein_growth.png",
        category: Category::Whey,
        brand: "Growth",
        description: "Whey protein concentrado de alta qualidade para ganho de massa muscular.",
        badge: Some(Badge::Sale),
        rating: 4.8,
        reviews: 156,
    },
    SeedRow {
        id: "whey-2",
        name: "Whey Protein Growth 90%",
        price: 11399,
        original_price: None,
        image: "assets/img/wheys/whey_protein9_growth.png",
        category: Category::Whey,
        brand: "Growth",
        description: "Whey protein 90% com excelente absorção e sabor.",
        badge: None,
        rating: 4.7,
        reviews: 89,
    },
    SeedRow {
        id: "whey-3",
        name: "Whey Protein Integral Médica 100%",
        price: 10099,
        original_price: None,
        image: "assets/img/wheys/whey_protein_integralmedica.png",
        category: Category::Whey,
        brand: "Integral Médica",
        description: "Whey protein isolado da Integral Médica com alta pureza.",
        badge: Some(Badge::New),
        rating: 4.9,
        reviews: 203,
    },
    SeedRow {
        id: "whey-4",
        name: "Whey Protein Black Skull",
        price: 7999,
        original_price: None,
        image: "assets/img/wheys/whey_protein_blackskull.jpg",
        category: Category::Whey,
        brand: "Black Skull",
        description: "Whey protein com ótimo custo-benefício da Black Skull.",
        badge: None,
        rating: 4.5,
        reviews: 67,
    },
    SeedRow {
        id: "whey-5",
        name: "Whey Protein Sabor Morango 900g",
        price: 9999,
        original_price: None,
        image: "assets/img/wheys/morango.jpeg",
        category: Category::Whey,
        brand: "Supreme",
        description: "Delicioso whey protein sabor morango, 900g.",
        badge: None,
        rating: 4.6,
        reviews: 124,
    },
    SeedRow {
        id: "whey-6",
        name: "Whey Protein Sabor Chocolate 900g",
        price: 7899,
        original_price: None,
        image: "assets/img/wheys/chocolate.jpeg",
        category: Category::Whey,
        brand: "Supreme",
        description: "Whey protein sabor chocolate cremoso, 900g.",
        badge: None,
        rating: 4.7,
        reviews: 98,
    },
    SeedRow {
        id: "whey-7",
        name: "Whey Protein Concentrado 900g",
        price: 11999,
        original_price: None,
        image: "assets/img/wheys/concentrado.jpeg",
        category: Category::Whey,
        brand: "Premium",
        description: "Whey protein concentrado premium, 900g.",
        badge: None,
        rating: 4.8,
        reviews: 145,
    },
    SeedRow {
        id: "whey-8",
        name: "Top Whey 3W 900g",
        price: 7999,
        original_price: None,
        image: "assets/img/wheys/TOPWHEY.png",
        category: Category::Whey,
        brand: "Top Whey",
        description: "Blend de 3 tipos de whey protein, 900g.",
        badge: None,
        rating: 4.4,
        reviews: 76,
    },
    SeedRow {
        id: "creatina-1",
        name: "Creatina Integral Médica 300g",
        price: 15399,
        original_price: None,
        image: "assets/img/creatina/creatina_integral_300g.png",
        category: Category::Creatina,
        brand: "Integral Médica",
        description: "Creatina monohidratada pura, 300g da Integral Médica.",
        badge: None,
        rating: 4.9,
        reviews: 234,
    },
    SeedRow {
        id: "creatina-2",
        name: "Creatina Growth 250g",
        price: 8399,
        original_price: None,
        image: "assets/img/creatina/creatina_grow_250g.png",
        category: Category::Creatina,
        brand: "Growth",
        description: "Creatina Growth de alta qualidade, 250g.",
        badge: None,
        rating: 4.7,
        reviews: 156,
    },
    SeedRow {
        id: "creatina-3",
        name: "Creatina Probiótica 300g",
        price: 10099,
        original_price: None,
        image: "assets/img/creatina/creatina_prob_300g.png",
        category: Category::Creatina,
        brand: "Probiótica",
        description: "Creatina Probiótica com excelente solubilidade, 300g.",
        badge: None,
        rating: 4.8,
        reviews: 189,
    },
    SeedRow {
        id: "creatina-4",
        name: "Creatina Black Skull 300g",
        price: 7999,
        original_price: None,
        image: "assets/img/creatina/creatina_skull_300g.png",
        category: Category::Creatina,
        brand: "Black Skull",
        description: "Creatina Black Skull com ótimo custo-benefício, 300g.",
        badge: Some(Badge::Sale),
        rating: 4.6,
        reviews: 98,
    },
    SeedRow {
        id: "pre-1",
        name: "Pré-Treino Darkness 300g",
        price: 8999,
        original_price: None,
        image: "assets/img/pre-treino/darkness-pre.jpg",
        category: Category::PreTreino,
        brand: "Darkness",
        description: "Pré-treino com cafeína e beta-alanina, 300g.",
        badge: None,
        rating: 4.7,
        reviews: 167,
    },
    SeedRow {
        id: "pre-2",
        name: "Pré-Treino Growth 250g",
        price: 7699,
        original_price: None,
        image: "assets/img/pre-treino/growth-pre.jpg",
        category: Category::PreTreino,
        brand: "Growth",
        description: "Pré-treino Growth com energia e foco, 250g.",
        badge: None,
        rating: 4.5,
        reviews: 134,
    },
    SeedRow {
        id: "pre-3",
        name: "Pré-Treino Black Skull 300g",
        price: 9499,
        original_price: None,
        image: "assets/img/pre-treino/blackskull-pre.jpg",
        category: Category::PreTreino,
        brand: "Black Skull",
        description: "Pré-treino Black Skull com fórmula avançada, 300g.",
        badge: Some(Badge::New),
        rating: 4.8,
        reviews: 201,
    },
    SeedRow {
        id: "pre-4",
        name: "Pré-Treino Integral Médica 200g",
        price: 11299,
        original_price: None,
        image: "assets/img/pre-treino/integralmedica-pre.jpg",
        category: Category::PreTreino,
        brand: "Integral Médica",
        description: "Pré-treino premium da Integral Médica, 200g.",
        badge: None,
        rating: 4.9,
        reviews: 156,
    },
];

static SEED: Lazy<Vec<Product>> = Lazy::new(|| {
    SEED_ROWS
        .iter()
        .map(|row| Product {
            id: row.id.to_string(),
            name: row.name.to_string(),
            price: Decimal::new(row.price, 2),
            original_price: row.original_price.map(|cents| Decimal::new(cents, 2)),
            image: row.image.to_string(),
            category: row.category,
            brand: row.brand.to_string(),
            description: row.description.to_string(),
            badge: row.badge,
            rating: row.rating,
            reviews: row.reviews,
        })
        .collect()
});

/// Read-only product catalog.
///
/// Products are kept grouped by category in catalog order (whey, creatina,
/// pre-treino). Lookups never fail: misses return `None` or an empty list.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from an arbitrary product list. The list is stably
    /// regrouped into category order.
    pub fn new(mut products: Vec<Product>) -> Self {
        products.sort_by_key(|p| Category::ALL.iter().position(|c| *c == p.category));
        Self { products }
    }

    /// The built-in 16-product storefront catalog
    pub fn seeded() -> Self {
        Self {
            products: (*SEED).clone(),
        }
    }

    /// All products, category groups concatenated
    pub fn get_all(&self) -> &[Product] {
        &self.products
    }

    pub fn get_by_category(&self, category: Category) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category == category)
            .collect()
    }

    /// Category lookup by name; unknown names yield an empty list.
    pub fn get_by_category_name(&self, name: &str) -> Vec<&Product> {
        match Category::parse(name) {
            Some(category) => self.get_by_category(category),
            None => Vec::new(),
        }
    }

    /// Case-insensitive substring search over name, brand and description,
    /// in catalog order.
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let needle = query.to_lowercase();
        self.products.iter().filter(|p| p.matches(&needle)).collect()
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// The first `n` products in catalog order
    pub fn first(&self, n: usize) -> &[Product] {
        &self.products[..n.min(self.products.len())]
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::seeded()
    }
}
