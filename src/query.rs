use crate::domain::Product;

/// Products whose name contains `term`, ignoring case, in collection order.
///
/// An empty term matches everything.
pub fn filter_by_name(products: &[Product], term: &str) -> Vec<Product> {
    if term.is_empty() {
        return products.to_vec();
    }
    let needle = term.to_lowercase();
    products
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::seed_products;

    fn names(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_empty_term_keeps_everything_in_order() {
        let products = seed_products();
        assert_eq!(filter_by_name(&products, ""), products);
    }

    #[test]
    fn test_case_insensitive_substring() {
        let products = seed_products();
        assert_eq!(names(&filter_by_name(&products, "LIM")), ["Limpiador Multiuso"]);
        assert_eq!(names(&filter_by_name(&products, "de")), ["Detergente", "Bolsas de Residuos"]);
        assert!(filter_by_name(&products, "jabón").is_empty());
    }

    #[test]
    fn test_matches_only_name() {
        let products = seed_products();
        // "Botella" only appears in descriptions.
        assert!(filter_by_name(&products, "botella").is_empty());
    }
}
