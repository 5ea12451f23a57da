use std::collections::HashSet;

use jsonapi_graph::{
    IdRegistry, JsonApiSerializer, LocalId, Primary, Record, RelationshipValue, RemoteId, Schema, SchemaDefinition,
    Serializer, SharedIdRegistry,
};
use serde_json::json;

const BLOG: &str = r#"{
    "idField": "__id",
    "remoteIdField": "id",
    "irregular": { "person": "people" },
    "models": {
        "article": {
            "links": {
                "author": { "model": "person", "type": "hasOne" },
                "comments": { "model": "comment", "type": "hasMany" }
            }
        },
        "person": { "links": { "articles": { "model": "article", "type": "hasMany" } } },
        "comment": { "links": { "article": { "model": "article", "type": "hasOne" } } }
    }
}"#;

fn blog_schema() -> Schema {
    SchemaDefinition::from_json(BLOG).unwrap().into_schema().unwrap()
}

fn blog_serializer() -> JsonApiSerializer<Schema> {
    JsonApiSerializer::new(blog_schema(), SharedIdRegistry::default())
}

fn primary(graph: &jsonapi_graph::NormalizedGraph) -> &Record {
    match &graph.primary {
        Primary::One(r) => r,
        Primary::Many(_) => panic!("expected single primary record"),
    }
}

#[test]
fn article_with_author_normalizes_and_serializes_back() {
    let ser = blog_serializer();

    let graph = ser
        .deserialize("article", &json!({"articles": {"id": "1", "title": "Hi", "links": {"author": "9"}}}))
        .unwrap();
    let article = primary(&graph);

    let author = article.relationship("author").unwrap().as_one().unwrap();
    {
        let reg = ser.registry().lock();
        assert_eq!(reg.local_to_remote("person", author), Some(&RemoteId::from("9")));
        assert_eq!(reg.remote_to_local("person", &RemoteId::from("9")), Some(author));
    }

    let out = ser.serialize("article", article).unwrap();
    assert_eq!(
        out.payload,
        json!({"articles": {"id": "1", "title": "Hi", "links": {"author": "9", "comments": []}}})
    );
}

#[test]
fn duplicate_remote_ids_collapse_in_has_many() {
    let ser = blog_serializer();
    let graph = ser
        .deserialize("article", &json!({"articles": {"id": "1", "links": {"comments": ["5", "6", "6"]}}}))
        .unwrap();

    let comments = primary(&graph).relationship("comments").unwrap().as_many().unwrap();
    assert_eq!(comments.len(), 2);
}

#[test]
fn has_many_serializes_to_array_of_remote_ids() {
    let ser = blog_serializer();
    let graph = ser
        .deserialize("article", &json!({"articles": {"id": "1", "links": {"comments": ["6", "5"]}}}))
        .unwrap();
    let article = primary(&graph);

    let out = ser.serialize("article", article).unwrap();
    let emitted: HashSet<String> = out.payload["articles"]["links"]["comments"]
        .as_array()
        .expect("comments must serialize to an array")
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();

    let expected: HashSet<String> = ["5", "6"].iter().map(|s| s.to_string()).collect();
    assert_eq!(emitted, expected);
}

#[test]
fn side_loaded_round_trip_preserves_attributes_and_relationships() {
    let ser = blog_serializer();
    let payload = json!({
        "articles": [
            {"id": "1", "title": "One", "links": {"author": "9", "comments": ["5"]}},
            {"id": "2", "title": "Two", "links": {"author": "9", "comments": []}}
        ],
        "linked": {
            "people": [{"id": "9", "name": "Dan", "links": {"articles": ["1", "2"]}}],
            "comments": [{"id": "5", "body": "nice", "links": {"article": "1"}}]
        }
    });

    let first = ser.deserialize("article", &payload).unwrap();
    let Primary::Many(articles) = &first.primary else { panic!("expected batch") };

    let out = ser.serialize_many("article", articles).unwrap();
    assert!(out.is_complete());

    //feed the serialized articles back in; everything resolves to the same local records
    let second = ser.deserialize("article", &out.payload).unwrap();
    let Primary::Many(again) = &second.primary else { panic!("expected batch") };

    for (a, b) in articles.iter().zip(again.iter()) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.attributes, b.attributes);
        assert_eq!(a.relationships, b.relationships);
    }
}

#[test]
fn registry_stays_injective_across_passes() {
    let ser = blog_serializer();
    let payloads = [
        json!({"articles": {"id": "1", "links": {"author": "9", "comments": ["5", "6"]}}}),
        json!({"articles": [{"id": "2", "links": {"author": 9}}, {"id": "1", "links": {"comments": ["6", "7"]}}]}),
        json!({"people": {"id": "9", "links": {"articles": ["1", "2", "3"]}}}),
    ];
    for (i, p) in payloads.iter().enumerate() {
        let model = if i == 2 { "person" } else { "article" };
        ser.deserialize(model, p).unwrap();
    }

    let reg = ser.registry().lock();
    for model in ["article", "person", "comment"] {
        let pairs: Vec<(LocalId, RemoteId)> = reg.iter_pairs(model).map(|(l, r)| (l, r.clone())).collect();
        let locals: HashSet<LocalId> = pairs.iter().map(|(l, _)| *l).collect();
        let remotes: HashSet<RemoteId> = pairs.iter().map(|(_, r)| r.clone()).collect();
        assert_eq!(locals.len(), pairs.len(), "{} local ids must be unique", model);
        assert_eq!(remotes.len(), pairs.len(), "{} remote ids must be unique", model);
    }
    assert_eq!(reg.len("article"), 3);
    assert_eq!(reg.len("person"), 1);
    assert_eq!(reg.len("comment"), 3);
}

#[test]
fn malformed_link_does_not_abort_the_payload() {
    let ser = blog_serializer();
    let graph = ser
        .deserialize(
            "article",
            &json!({"articles": [
                {"id": "1", "links": {"author": ["9"]}},
                {"id": "2", "links": {"author": "9"}}
            ]}),
        )
        .unwrap();

    let rs = graph.primary.records();
    assert_eq!(rs[0].meta.links.get("author"), Some(&json!(["9"])));
    assert_eq!(rs[0].relationship("author"), Some(&RelationshipValue::One(None)));
    assert!(rs[1].relationship("author").unwrap().as_one().is_some());
}

#[test]
fn partially_persisted_graph_serializes_with_report() {
    let schema = blog_schema();
    let mut reg = IdRegistry::new();
    reg.register("comment", LocalId(10), RemoteId::from("5")).unwrap();
    let new_author = reg.generate_local_id();
    let ser = JsonApiSerializer::new(schema, SharedIdRegistry::new(reg));

    let article = Record::new("article", LocalId(1))
        .with_attribute("title", "draft")
        .with_one("author", Some(new_author))
        .with_many("comments", [LocalId(10)]);

    let out = ser.serialize("article", &article).unwrap();
    assert_eq!(out.payload, json!({"articles": {"title": "draft", "links": {"comments": ["5"]}}}));
    assert_eq!(out.unresolved.len(), 1);
    assert_eq!(out.unresolved[0].local, new_author);
    assert_eq!(out.unresolved[0].target, "person");
}

#[test]
fn shared_id_field_round_trips_remote_ids_verbatim() {
    let schema = Schema::new("id", "id")
        .with_model("article", jsonapi_graph::ModelDef::new().has_one("author", "person"))
        .with_model("person", jsonapi_graph::ModelDef::new());
    let ser = JsonApiSerializer::new(schema, SharedIdRegistry::default());

    let payload = json!({"articles": [
        {"id": "abc", "title": "Hi", "links": {"author": "12"}},
        {"id": "12", "title": "numeric string", "links": {"author": 3}},
        {"title": "draft"},
        {"id": 1, "title": "server"}
    ]});
    let graph = ser.deserialize("article", &payload).unwrap();
    let rs = graph.primary.records();

    let ids: HashSet<LocalId> = rs.iter().map(|r| r.id).collect();
    assert_eq!(ids.len(), 4, "every record needs its own local id");

    let out = ser.serialize_many("article", rs).unwrap();
    assert!(out.is_complete());
    assert_eq!(
        out.payload,
        json!({"articles": [
            {"id": "abc", "title": "Hi", "links": {"author": "12"}},
            {"id": "12", "title": "numeric string", "links": {"author": 3}},
            {"title": "draft", "links": {"author": null}},
            {"id": 1, "title": "server", "links": {"author": null}}
        ]})
    );
}
