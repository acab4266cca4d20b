//! Write a deterministic synthetic `meals.csv` so the shell can be exercised
//! without the real export.

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range_f64(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    fn range_usize(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.range_usize(items.len())]
    }
}

const DISHES: &[&str] = &[
    "Tikka Masala", "Carbonara", "Bibimbap", "Pad Thai", "Enchiladas",
    "Shakshuka", "Katsu Curry", "Gnocchi", "Tagine", "Jambalaya",
    "Pozole", "Ramen", "Moussaka", "Paella", "Pho",
];

const PROTEINS: &[&str] = &[
    "Chicken", "Beef", "Tofu", "Salmon", "Shrimp", "Mushroom", "Pork", "Lentil",
];

const CUISINE_POOL: &[&[&str]] = &[
    &["Indian", "Asian"],
    &["Italian", "Mediterranean"],
    &["Korean", "Asian"],
    &["Thai", "Asian"],
    &["Mexican", "Latin"],
    &["Middle Eastern", "Mediterranean"],
    &["Japanese", "Asian"],
    &["Italian"],
    &["Moroccan", "Mediterranean"],
    &["Cajun", "American"],
    &["Mexican"],
    &["Japanese"],
    &["Greek", "Mediterranean"],
    &["Spanish", "Mediterranean"],
    &["Vietnamese", "Asian"],
];

const SPEC_POOL: &[&str] = &[
    "High Protein", "Gluten Free", "Vegan", "Vegetarian", "Low Carb",
    "Dairy Free", "Spicy", "Keto Friendly",
];

const CHEFS: &[(&str, bool)] = &[
    ("Ana Reyes", false),
    ("Marco Bellini", true),
    ("Yuki Tanaka", false),
    ("Dev Kapoor", false),
    ("Claire Dubois", true),
    ("Tom Okafor", false),
];

fn main() {
    let mut rng = SimpleRng::new(42);

    let output_path = "meals.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");
    writer
        .write_record([
            "meal_id",
            "name",
            "description",
            "cuisines",
            "calories",
            "price",
            "chef_name",
            "is_celebrity_chef",
            "rating",
            "review_count",
            "specifications",
            "url",
        ])
        .expect("Failed to write header");

    let mut rows = 0u64;
    for (dish_idx, dish) in DISHES.iter().enumerate() {
        for _variant in 0..4 {
            let meal_id = 1000 + rows;
            let protein = rng.pick(PROTEINS);
            let cuisines = CUISINE_POOL[dish_idx].join(", ");

            // About one meal in ten is still unrated.
            let (rating, review_count) = if rng.next_f64() < 0.1 {
                (0.0, 0)
            } else {
                (rng.range_f64(2.5, 5.0), rng.range_usize(900) as u32 + 1)
            };

            // Occasional missing or placeholder price (below the floor).
            let price = match rng.range_usize(10) {
                0 => String::new(),
                1 => "1.00".to_string(),
                _ => format!("{:.2}", rng.range_f64(8.0, 24.0)),
            };

            let mut specs: Vec<&str> = Vec::new();
            for spec in SPEC_POOL {
                if rng.next_f64() < 0.25 {
                    specs.push(spec);
                }
            }

            let (chef, celebrity) = CHEFS[rng.range_usize(CHEFS.len())];
            let calories = 250 + rng.range_usize(700);

            writer
                .write_record([
                    meal_id.to_string(),
                    format!("{protein} {dish}"),
                    format!("{dish} with {} and seasonal sides", protein.to_lowercase()),
                    cuisines,
                    calories.to_string(),
                    price,
                    chef.to_string(),
                    if celebrity { "True" } else { "False" }.to_string(),
                    if rating > 0.0 {
                        format!("{rating:.1}")
                    } else {
                        String::new()
                    },
                    review_count.to_string(),
                    specs.join("|"),
                    format!("https://example.com/meals/{meal_id}"),
                ])
                .expect("Failed to write row");
            rows += 1;
        }
    }

    writer.flush().expect("Failed to flush output");
    println!("Wrote {rows} meals to {output_path}");
}
