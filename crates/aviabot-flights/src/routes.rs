//! Static route table: city pairs served by the carrier and the flight
//! time between them, in hours. Lookups work in either direction.

const ROUTE_HOURS: &[(&str, &str, u32)] = &[
    ("Москва", "Санкт-Петербург", 1),
    ("Москва", "Казань", 2),
    ("Москва", "Екатеринбург", 2),
    ("Москва", "Сочи", 2),
    ("Москва", "Самара", 2),
    ("Москва", "Уфа", 2),
    ("Москва", "Калининград", 2),
    ("Москва", "Новосибирск", 4),
    ("Москва", "Иркутск", 6),
    ("Москва", "Владивосток", 8),
    ("Санкт-Петербург", "Казань", 2),
    ("Санкт-Петербург", "Екатеринбург", 2),
    ("Санкт-Петербург", "Сочи", 3),
    ("Санкт-Петербург", "Калининград", 2),
    ("Санкт-Петербург", "Новосибирск", 4),
    ("Екатеринбург", "Казань", 1),
    ("Екатеринбург", "Сочи", 3),
    ("Екатеринбург", "Новосибирск", 2),
    ("Екатеринбург", "Владивосток", 7),
    ("Казань", "Сочи", 2),
    ("Казань", "Уфа", 1),
    ("Самара", "Сочи", 2),
    ("Новосибирск", "Иркутск", 2),
    ("Новосибирск", "Владивосток", 5),
    ("Сочи", "Уфа", 3),
];

/// All cities appearing in the route table, in first-appearance order.
/// The order is stable so seeded suggestion sampling is deterministic.
pub fn cities() -> Vec<&'static str> {
    let mut out: Vec<&'static str> = Vec::new();
    for &(from, to, _) in ROUTE_HOURS {
        if !out.contains(&from) {
            out.push(from);
        }
        if !out.contains(&to) {
            out.push(to);
        }
    }
    out
}

/// Cities with a direct route to or from `city`, in table order. Empty for
/// an unknown city.
pub fn destinations_from(city: &str) -> Vec<&'static str> {
    let mut out: Vec<&'static str> = Vec::new();
    for &(from, to, _) in ROUTE_HOURS {
        if from == city && !out.contains(&to) {
            out.push(to);
        } else if to == city && !out.contains(&from) {
            out.push(from);
        }
    }
    out
}

/// Whether `name` (in canonical title-cased form) is a known city.
pub fn is_city(name: &str) -> bool {
    ROUTE_HOURS
        .iter()
        .any(|&(from, to, _)| from == name || to == name)
}

/// Flight time in hours between two cities, either direction.
pub fn flight_hours(city_from: &str, city_to: &str) -> Option<u32> {
    ROUTE_HOURS.iter().find_map(|&(from, to, hours)| {
        if (from == city_from && to == city_to) || (from == city_to && to == city_from) {
            Some(hours)
        } else {
            None
        }
    })
}
