use super::record::Record;

/// Cars written into the table on every start.
///
/// Inserted with insert-or-ignore: edited cars keep their changes, deleted
/// ones come back on the next start.
pub fn initial_stock() -> Vec<Record> {
    vec![
        Record::car(Some(1), "Ford", "Focus", "Hatchback", 2011, 45900, 4000),
        Record::car(Some(2), "Ford", "Focus", "Estate", 2014, 32000, 7000),
        Record::car(Some(3), "Ford", "Fiesta", "Hatchback", 2016, 19750, 6000),
        Record::car(Some(4), "Fiat", "500", "Saloon", 2013, 37000, 5900),
        Record::car(Some(5), "Skoda", "Fabia", "Estate", 2014, 32000, 7200),
        Record::car(Some(6), "Ford", "Mondeo", "Hatchback", 2010, 100000, 3750),
        Record::car(Some(7), "Citroen", "C2", "Hatchback", 2015, 10500, 8200),
        Record::car(Some(8), "Honda", "Civic", "Cabriolet", 2014, 45000, 6500),
    ]
}
