pub mod sale_date;
