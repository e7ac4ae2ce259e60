pub mod chunk_dto;
