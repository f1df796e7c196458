pub mod size_repricing;
