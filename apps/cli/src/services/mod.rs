pub mod source_index;
