// Loaders for the external collaborators: intraday bar exports and the journal sheet.
pub mod csv_parser;
pub mod market_data;
pub mod trade_log;
