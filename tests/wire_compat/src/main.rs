fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use linkdrop_protocol::{Packet, PayloadTransferInfo, SHARE_PACKET_TYPE, ShareBody};

    /// Parses expected JSON and compares against the serialized packet.
    fn assert_wire(packet: &Packet, expected: &str) {
        let actual = serde_json::to_value(packet).unwrap();
        let expected: serde_json::Value = serde_json::from_str(expected).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn file_announce_wire_shape() {
        let packet = Packet::new(
            SHARE_PACKET_TYPE,
            &ShareBody::File {
                filename: "photo.jpg".into(),
            },
        )
        .unwrap()
        .with_payload(10, PayloadTransferInfo { port: 1739 });

        assert_wire(
            &packet,
            r#"{
                "id": 0,
                "type": "linkdrop.share.request",
                "body": {"filename": "photo.jpg"},
                "payloadSize": 10,
                "payloadTransferInfo": {"port": 1739}
            }"#,
        );
    }

    #[test]
    fn text_wire_shape() {
        let packet = Packet::new(
            SHARE_PACKET_TYPE,
            &ShareBody::Text {
                text: "a note".into(),
            },
        )
        .unwrap();

        assert_wire(
            &packet,
            r#"{
                "id": 0,
                "type": "linkdrop.share.request",
                "body": {"text": "a note"}
            }"#,
        );
    }

    #[test]
    fn link_wire_shape() {
        let packet = Packet::new(
            SHARE_PACKET_TYPE,
            &ShareBody::Link {
                url: "https://example.com".into(),
            },
        )
        .unwrap();

        assert_wire(
            &packet,
            r#"{
                "id": 0,
                "type": "linkdrop.share.request",
                "body": {"url": "https://example.com"}
            }"#,
        );
    }

    #[test]
    fn inbound_file_announce_parses() {
        let json = r#"{
            "id": 1724140000,
            "type": "linkdrop.share.request",
            "body": {"filename": "book.pdf"},
            "payloadSize": 4096,
            "payloadTransferInfo": {"port": 1740}
        }"#;

        let packet: Packet = serde_json::from_str(json).unwrap();
        assert_eq!(packet.ptype, SHARE_PACKET_TYPE);
        assert_eq!(packet.payload_size, Some(4096));
        assert_eq!(packet.payload_transfer_info.unwrap().port, 1740);
        assert_eq!(
            ShareBody::from_packet(&packet).unwrap(),
            ShareBody::File {
                filename: "book.pdf".into()
            }
        );
    }

    #[test]
    fn inbound_multi_field_body_prefers_filename() {
        // Peers never validate that exactly one field is present; the
        // decode priority pins the historical routing.
        let json = r#"{
            "id": 0,
            "type": "linkdrop.share.request",
            "body": {"url": "https://x.org", "filename": "a.txt", "text": "t"},
            "payloadSize": 1,
            "payloadTransferInfo": {"port": 1739}
        }"#;

        let packet: Packet = serde_json::from_str(json).unwrap();
        assert!(matches!(
            ShareBody::from_packet(&packet).unwrap(),
            ShareBody::File { .. }
        ));
    }
}
