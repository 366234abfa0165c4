//! Schema definition served at `/graphql/schema`.

pub const SCHEMA_SDL: &str = r#"type FilterOptions {
  types: [String!]!
  weaknesses: [String!]!
}

input FiltersInput {
  types: [String]
  weaknesses: [String]
}

type Pokemon {
  id: ID!
  num: ID!
  name: String!
  img: String!
  types: [String!]!
  weaknesses: [String!]!
  height: String!
  weight: String!
  egg: String!
  prevEvolutions: [Pokemon!]!
  nextEvolutions: [Pokemon!]!
  candy: String
  candyCount: Int
}

type Query {
  pokemonFilters: FilterOptions!
  pokemonMany(skip: Int, limit: Int, searchTerm: String, filters: FiltersInput): [Pokemon!]!
  pokemonSearch(skip: Int, limit: Int, searchTerm: String): [Pokemon!]!
  pokemonOne(id: ID!): Pokemon
}
"#;
